/// DC3D terminal renderer
///
/// Shows a scene (a cube unless `--scene` is given) with truecolor half blocks.
/// Controls:
///   - Drag with the left button: move or rotate, depending on the mode
///   - 1/2/3/4: translate XY, translate Z, rotate XY, rotate Z
///   - A: toggle the timer rotation
///   - P/S: export PNG / SVG data URIs
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use dc3d_core::Scene;
use dc3d_terminal::{cli::Cli, export_once, FileSink, TerminalApp};
use std::fs::File;

/// Edge length of the default cube
const CUBE_SIZE: f64 = 200.0;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.export.is_some())?;

    let config = cli.render_config().context("invalid configuration")?;
    let scene = match &cli.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("cannot load scene {}", path.display()))?,
        None => Scene::cube(CUBE_SIZE),
    };
    log::info!(
        "{} polygons, {}x{} viewport",
        scene.len(),
        config.width,
        config.height
    );

    if let Some(format) = cli.export {
        return export_headless(&cli, scene, config, format.into());
    }

    let mut app = TerminalApp::new(scene, config, cli.export_dir.clone())?;
    if cli.animate {
        app.animate()?;
    }
    app.run()
}

/// Headless runs log to stderr; interactive runs own the screen and log to a file
fn init_logging(headless: bool) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_micros();
    if !headless {
        let path = std::env::temp_dir().join("dc3d-terminal.log");
        let log_file = File::create(&path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    builder.init();
    Ok(())
}

fn export_headless(
    cli: &Cli,
    scene: Scene,
    config: dc3d_core::RenderConfig,
    format: dc3d_terminal::ExportFormat,
) -> anyhow::Result<()> {
    // Export drivers bring their own surface, the installed driver never draws
    let mut renderer = dc3d_core::Renderer::new(scene, config, NullDriver)?;
    match &cli.output {
        Some(path) => export_once(&mut renderer, format, FileSink::new(path))?,
        None => export_once(&mut renderer, format, |uri: String| println!("{uri}"))?,
    }
    Ok(())
}

/// Installed driver for headless runs
struct NullDriver;

impl dc3d_core::OutputDriver for NullDriver {
    fn begin(&mut self, _width: f64, _height: f64) -> dc3d_core::Result<()> {
        Ok(())
    }

    fn draw_polygon(&mut self, _polygon: &dc3d_core::ScreenPolygon) -> dc3d_core::Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> dc3d_core::Result<()> {
        Ok(())
    }
}
