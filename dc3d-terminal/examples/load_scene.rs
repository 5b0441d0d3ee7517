/// Example: Load a JSON scene and render it in the terminal
///
/// Usage: cargo run --example load_scene -- path/to/scene.json
use anyhow::Context;
use dc3d_core::{RenderConfig, Scene};
use dc3d_terminal::TerminalApp;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let scene = match args.get(1) {
        Some(path) => {
            println!("Loading scene file: {path}");
            Scene::load(path).with_context(|| format!("failed to load {path}"))?
        }
        None => {
            eprintln!("Usage: {} <scene.json>", args[0]);
            eprintln!("\nNo scene file provided, using default cube...");
            Scene::cube(200.0)
        }
    };

    println!("Loaded {} polygons", scene.len());
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, RenderConfig::default(), env::temp_dir())?;
    app.run()
}
