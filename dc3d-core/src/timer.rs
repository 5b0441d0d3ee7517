/// Fixed interval rotation, for demos
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::event::{EventGenerator, InputEvent, SceneEvent};

pub const TIMER_INTERVAL: Duration = Duration::from_millis(10);

/// Rotation applied on every firing, regardless of how much time really passed
pub const TIMER_ROTATION: SceneEvent = SceneEvent::Rotate { x: 2, y: 4, z: 2 };

/// Fires every [`TIMER_INTERVAL`] from construction until dropped.
///
/// Each firing that finds the generator attached yields [`TIMER_ROTATION`]. A late tick
/// produces a single firing, missed intervals are not caught up, and the next firing is
/// scheduled one interval after the tick that fired.
#[derive(Debug, Clone)]
pub struct TimerGenerator {
    attached: bool,
    interval: Duration,
    next_fire: Instant,
}

impl TimerGenerator {
    pub fn new() -> Self {
        Self::starting_at(Instant::now(), TIMER_INTERVAL)
    }

    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Self {
            attached: false,
            interval,
            next_fire: start + interval,
        }
    }

    /// When the next firing is due; hosts can sleep or poll until then
    pub fn next_deadline(&self) -> Instant {
        self.next_fire
    }

    fn tick(&mut self, now: Instant) -> Option<SceneEvent> {
        if now < self.next_fire {
            return None;
        }
        self.next_fire = now + self.interval;
        self.attached.then_some(TIMER_ROTATION)
    }
}

impl Default for TimerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventGenerator for TimerGenerator {
    fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Err(Error::AlreadyAttached);
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn on_input(&mut self, input: &InputEvent) -> Option<SceneEvent> {
        match input {
            InputEvent::Tick(now) => self.tick(*now),
            _ => None,
        }
    }
}
