// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};
use dc3d_core::{Color, RenderConfig};
use std::path::PathBuf;

use crate::ExportFormat;

#[derive(Parser, Debug, Clone)]
#[command(name = "dc3d-terminal")]
#[command(about = "Polygon renderer in the terminal", long_about = None)]
pub struct Cli {
    /// Scene file (JSON list of polygons); a cube is shown when left out
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Renderer configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<f64>,

    #[arg(long)]
    pub height: Option<f64>,

    /// Background colour, e.g. "#203040" or "rgba(0, 0, 0, 0.5)"
    #[arg(long)]
    pub background: Option<Color>,

    /// Projection scale
    #[arg(long)]
    pub viewpoint: Option<f64>,

    /// Camera distance added to every z before dividing
    #[arg(long)]
    pub distance: Option<f64>,

    /// Start with the timer rotation instead of pointer control
    #[arg(long, default_value = "false")]
    pub animate: bool,

    /// Render one frame, print its data URI and exit
    #[arg(long, value_enum)]
    pub export: Option<ExportArg>,

    /// Write the exported data URI here instead of stdout
    #[arg(long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Where the interactive P and S keys store their exports
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportArg {
    Png,
    Svg,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Png => ExportFormat::Png,
            ExportArg::Svg => ExportFormat::Svg,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with the command line flags laid over it
    pub fn render_config(&self) -> dc3d_core::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(viewpoint) = self.viewpoint {
            config.viewpoint = viewpoint;
        }
        if let Some(distance) = self.distance {
            config.distance = distance;
        }
        config.validate()?;
        Ok(config)
    }
}
