/// Ties the scene, the transform engine, the depth sorter, the projector, an output driver and
/// an event generator together
use crate::config::RenderConfig;
use crate::depth;
use crate::driver::OutputDriver;
use crate::error::Result;
use crate::event::{EventGenerator, InputEvent, SceneEvent};
use crate::geometry::{Scene, ScreenPolygon};
use crate::projection::Projector;
use crate::transform::Transform;

/// Owns the scene and redraws all of it after every event.
///
/// The renderer is idle while no generator is attached and listening otherwise. Events are
/// handled one at a time, in order, each with one full render pass.
pub struct Renderer<D: OutputDriver = Box<dyn OutputDriver>> {
    scene: Scene,
    config: RenderConfig,
    transform: Transform,
    projector: Projector,
    driver: D,
    generator: Option<Box<dyn EventGenerator>>,
}

impl<D: OutputDriver> Renderer<D> {
    pub fn new(scene: Scene, config: RenderConfig, driver: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scene,
            projector: Projector::new(config.viewpoint, config.distance),
            config,
            transform: Transform::new(),
            driver,
            generator: None,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Install a new output driver, returning the previous one
    pub fn set_driver(&mut self, driver: D) -> D {
        log::debug!("output driver replaced");
        std::mem::replace(&mut self.driver, driver)
    }

    /// Detach the current generator, if any, then attach `generator`.
    ///
    /// If `generator` refuses to attach, the previous generator is attached again and the error
    /// is returned.
    pub fn set_event_generator(
        &mut self,
        mut generator: Box<dyn EventGenerator>,
    ) -> Result<Option<Box<dyn EventGenerator>>> {
        let previous = self.take_event_generator();
        if let Err(err) = generator.attach() {
            if let Some(mut previous) = previous {
                match previous.attach() {
                    Ok(()) => self.generator = Some(previous),
                    Err(restore) => log::warn!("previous event generator not restored: {restore}"),
                }
            }
            return Err(err);
        }
        self.generator = Some(generator);
        log::debug!("event generator attached");
        Ok(previous)
    }

    /// Detach and hand back the current generator, leaving the renderer idle
    pub fn take_event_generator(&mut self) -> Option<Box<dyn EventGenerator>> {
        let mut generator = self.generator.take()?;
        generator.detach();
        log::debug!("event generator detached");
        Some(generator)
    }

    pub fn is_listening(&self) -> bool {
        self.generator.as_ref().is_some_and(|g| g.is_attached())
    }

    /// Feed host input to the active generator. Returns whether a frame was rendered.
    pub fn handle_input(&mut self, input: &InputEvent) -> Result<bool> {
        let Some(event) = self.generator.as_mut().and_then(|g| g.on_input(input)) else {
            return Ok(false);
        };
        self.notify(event)?;
        Ok(true)
    }

    /// Apply an event's transform to the scene, then render
    pub fn notify(&mut self, event: SceneEvent) -> Result<()> {
        log::trace!("notify {event:?}");
        match event {
            SceneEvent::Translate { x, y, z } => self.transform.translate(&mut self.scene, x, y, z),
            SceneEvent::Rotate { x, y, z } => self.transform.rotate(&mut self.scene, x, y, z),
        }
        self.render()
    }

    /// One full pass over the scene with the installed driver
    pub fn render(&mut self) -> Result<()> {
        render_pass(&mut self.scene, &self.config, &self.projector, &mut self.driver)
    }

    /// One full pass with `driver` in place of the installed one, which is left untouched.
    /// This is how exports are taken.
    pub fn export(&mut self, driver: &mut dyn OutputDriver) -> Result<()> {
        log::debug!("exporting current view");
        render_pass(&mut self.scene, &self.config, &self.projector, driver)
    }
}

impl<D: OutputDriver> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.take_event_generator();
    }
}

fn render_pass<O: OutputDriver + ?Sized>(
    scene: &mut Scene,
    config: &RenderConfig,
    projector: &Projector,
    driver: &mut O,
) -> Result<()> {
    let (width, height) = (config.width, config.height);

    log::trace!("frame of {} polygons at {width}x{height}", scene.len());
    driver.begin(width, height)?;
    depth::sort(scene);
    driver.draw_polygon(&ScreenPolygon::rectangle(width, height, config.background))?;
    for polygon in &scene.polygons {
        driver.draw_polygon(&projector.project_polygon(polygon, width, height))?;
    }
    driver.finish()
}
