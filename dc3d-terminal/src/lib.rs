/// Terminal host for the DC3D renderer
use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use dc3d_core::{
    ControlMode, DataUriSink, InputEvent, Pixmap, PointerDragGenerator, RasterDriver,
    RasterExportDriver, RenderConfig, Renderer, Scene, SceneEvent, SvgExportDriver,
    TimerGenerator,
};
use std::fs;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use cli::Cli;
pub use renderer::{BlockRenderer, CellMapping};

/// Rows reserved above the image for the status line
const STATUS_ROWS: u16 = 1;

/// Longest wait for input when nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Degrees turned per arrow key press
const KEY_ROTATION: i32 = 5;

/// Writes each delivered data URI to its own numbered file
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataUriSink for FileSink {
    fn deliver(&mut self, uri: String) -> dc3d_core::Result<()> {
        fs::write(&self.path, uri)?;
        log::info!("export written to {}", self.path.display());
        Ok(())
    }
}

/// Image formats the toolbar can export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// Render the scene once with an export driver and hand the data URI to `sink`
pub fn export_once<D: dc3d_core::OutputDriver>(
    renderer: &mut Renderer<D>,
    format: ExportFormat,
    sink: impl DataUriSink + 'static,
) -> dc3d_core::Result<()> {
    match format {
        ExportFormat::Png => renderer.export(&mut RasterExportDriver::<Pixmap>::new(sink)),
        ExportFormat::Svg => renderer.export(&mut SvgExportDriver::new(sink)),
    }
}

/// Main application struct for interactive terminal rendering
pub struct TerminalApp {
    renderer: Renderer<RasterDriver<Pixmap>>,
    view: BlockRenderer,
    export_dir: PathBuf,
    exports: u32,
    mode: ControlMode,
    animating: bool,
    running: bool,
    dirty: bool,
    status: String,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: RenderConfig, export_dir: PathBuf) -> anyhow::Result<Self> {
        let pixmap = Pixmap::new(config.width.round() as u32, config.height.round() as u32);
        let driver = RasterDriver::new(pixmap)?;
        let mut renderer = Renderer::new(scene, config, driver)?;
        renderer.set_event_generator(Box::new(PointerDragGenerator::new()))?;

        let (cols, rows) = terminal::size().context("cannot read terminal size")?;
        let view = BlockRenderer::new(Self::mapping(&config, cols, rows));

        Ok(Self {
            renderer,
            view,
            export_dir,
            exports: 0,
            mode: ControlMode::default(),
            animating: false,
            running: true,
            dirty: true,
            status: String::new(),
        })
    }

    fn mapping(config: &RenderConfig, cols: u16, rows: u16) -> CellMapping {
        CellMapping::new(
            config.width.round() as u32,
            config.height.round() as u32,
            cols,
            rows,
            STATUS_ROWS,
        )
    }

    /// Start with the timer generator instead of pointer control
    pub fn animate(&mut self) -> anyhow::Result<()> {
        self.set_animation(true)
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self
            .renderer
            .render()
            .map_err(anyhow::Error::from)
            .and_then(|()| self.main_loop());

        // Cleanup
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let mut timer_deadline = None;

        while self.running {
            let timeout = timer_deadline
                .map(|deadline: Instant| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL)
                .min(IDLE_POLL);

            if event::poll(timeout)? {
                self.handle_event(event::read()?)?;
                // Drain whatever else queued up before drawing
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?)?;
                }
            }

            if self.animating {
                let now = Instant::now();
                self.dirty |= self.renderer.handle_input(&InputEvent::Tick(now))?;
                timer_deadline = Some(now + dc3d_core::timer::TIMER_INTERVAL);
            } else {
                timer_deadline = None;
            }

            if self.dirty {
                self.draw()?;
                self.dirty = false;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.view
                    .resize(Self::mapping(self.renderer.config(), cols, rows));
                execute!(stdout(), terminal::Clear(ClearType::All))?;
                self.dirty = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> anyhow::Result<()> {
        let (x, y) = self.view.mapping().cell_to_pixel(mouse.column, mouse.row);
        let input = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::Press { x, y },
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                InputEvent::Move { x, y }
            }
            MouseEventKind::Up(MouseButton::Left) => InputEvent::Release { x, y },
            _ => return Ok(()),
        };
        self.dirty |= self.renderer.handle_input(&input)?;
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) -> anyhow::Result<()> {
        if kind == KeyEventKind::Release {
            return Ok(());
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('1') => self.set_mode(ControlMode::TranslateXY)?,
            KeyCode::Char('2') => self.set_mode(ControlMode::TranslateZ)?,
            KeyCode::Char('3') => self.set_mode(ControlMode::RotateXY)?,
            KeyCode::Char('4') => self.set_mode(ControlMode::RotateZ)?,
            KeyCode::Char('a') => self.set_animation(!self.animating)?,
            KeyCode::Char('p') => self.export(ExportFormat::Png)?,
            KeyCode::Char('s') => self.export(ExportFormat::Svg)?,
            KeyCode::Up => self.rotate(KEY_ROTATION, 0, 0)?,
            KeyCode::Down => self.rotate(-KEY_ROTATION, 0, 0)?,
            KeyCode::Left => self.rotate(0, -KEY_ROTATION, 0)?,
            KeyCode::Right => self.rotate(0, KEY_ROTATION, 0)?,
            _ => {}
        }
        Ok(())
    }

    fn rotate(&mut self, x: i32, y: i32, z: i32) -> anyhow::Result<()> {
        let event = SceneEvent::Rotate {
            x: x.rem_euclid(360),
            y: y.rem_euclid(360),
            z: z.rem_euclid(360),
        };
        self.renderer.notify(event)?;
        self.dirty = true;
        Ok(())
    }

    fn set_mode(&mut self, mode: ControlMode) -> anyhow::Result<()> {
        self.mode = mode;
        self.renderer.handle_input(&InputEvent::Mode(mode))?;
        self.dirty = true;
        Ok(())
    }

    fn set_animation(&mut self, on: bool) -> anyhow::Result<()> {
        if on {
            self.renderer
                .set_event_generator(Box::new(TimerGenerator::new()))?;
        } else {
            let mut pointer = PointerDragGenerator::new();
            pointer.set_mode(self.mode);
            self.renderer.set_event_generator(Box::new(pointer))?;
        }
        self.animating = on;
        self.dirty = true;
        Ok(())
    }

    fn export(&mut self, format: ExportFormat) -> anyhow::Result<()> {
        self.exports += 1;
        let path = self
            .export_dir
            .join(format!("dc3d-{}.{}.uri", self.exports, format.extension()));
        export_once(&mut self.renderer, format, FileSink::new(&path))
            .with_context(|| format!("export to {} failed", path.display()))?;
        self.status = format!("saved {}", path.display());
        self.dirty = true;
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let mut stdout = stdout();
        self.view
            .draw(&mut stdout, self.renderer.driver().surface())?;

        let mode = match self.mode {
            ControlMode::TranslateXY => "T XY",
            ControlMode::TranslateZ => "T Z",
            ControlMode::RotateXY => "R XY",
            ControlMode::RotateZ => "R Z",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "DC3D | mode: {} | 1-4=Mode A=Animate P=PNG S=SVG Arrows=Rotate Q=Quit | {}",
                if self.animating { "timer" } else { mode },
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_once_svg() {
        let mut renderer = Renderer::new(
            Scene::cube(100.0),
            RenderConfig::new(100.0, 100.0),
            RasterDriver::new(Pixmap::new(100, 100)).unwrap(),
        )
        .unwrap();

        let dir = std::env::temp_dir().join(format!("dc3d-terminal-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cube.svg.uri");
        export_once(&mut renderer, ExportFormat::Svg, FileSink::new(&path)).unwrap();

        let uri = fs::read_to_string(&path).unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_once_png_keeps_live_surface() {
        let mut renderer = Renderer::new(
            Scene::cube(100.0),
            RenderConfig::new(50.0, 50.0),
            RasterDriver::new(Pixmap::new(50, 50)).unwrap(),
        )
        .unwrap();

        let uris = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let shared = std::rc::Rc::clone(&uris);
        export_once(&mut renderer, ExportFormat::Png, move |uri: String| {
            shared.borrow_mut().push(uri)
        })
        .unwrap();

        let uris = uris.borrow();
        assert_eq!(uris.len(), 1);
        assert!(uris[0].starts_with("data:image/png;base64,"));
        // The live pixmap was never drawn to
        assert!(renderer.driver().surface().data().iter().all(|&b| b == 0));
    }
}
