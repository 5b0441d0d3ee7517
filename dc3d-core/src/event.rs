/// Events that drive scene transforms, and the generators that produce them
use std::time::Instant;

use crate::error::Result;

/// A transform request delivered to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    Translate { x: f64, y: f64, z: f64 },
    /// Whole degrees per axis, in `[0, 360)`
    Rotate { x: i32, y: i32, z: i32 },
}

/// What a pointer drag does to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    TranslateXY,
    TranslateZ,
    RotateXY,
    RotateZ,
}

/// Host input, in surface coordinates where it has a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Press { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release { x: f64, y: f64 },
    /// The host clock advanced
    Tick(Instant),
    /// A control mode was picked from the toolbar
    Mode(ControlMode),
}

/// Turns host input into scene events.
///
/// Only an attached generator yields events. A generator may be attached to one renderer at a
/// time; attaching twice without detaching is an error.
pub trait EventGenerator {
    fn attach(&mut self) -> Result<()>;

    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    fn on_input(&mut self, input: &InputEvent) -> Option<SceneEvent>;
}
