/// Pointer drag input with hysteresis and switchable control modes
use crate::error::{Error, Result};
use crate::event::{ControlMode, EventGenerator, InputEvent, SceneEvent};

/// Movement an axis must accumulate before it produces anything, in surface units
pub const DRAG_THRESHOLD: f64 = 4.0;

/// Turns press/move/release sequences into translate or rotate events.
///
/// Small movements are buffered per axis. An axis whose buffered offset has reached
/// [`DRAG_THRESHOLD`] emits `round(delta / DRAG_THRESHOLD)` on the next move, where `delta` is
/// the whole displacement since its last emission, and then starts buffering again.
#[derive(Debug, Clone, Default)]
pub struct PointerDragGenerator {
    attached: bool,
    in_progress: bool,
    mode: ControlMode,
    last_x: f64,
    last_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl PointerDragGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        log::debug!("pointer control mode: {mode:?}");
        self.mode = mode;
    }

    fn press(&mut self, x: f64, y: f64) {
        self.last_x = x;
        self.last_y = y;
        self.in_progress = true;
    }

    fn drag(&mut self, x: f64, y: f64) -> Option<SceneEvent> {
        if !self.in_progress {
            return None;
        }

        let dx = axis_step(&mut self.offset_x, &mut self.last_x, x);
        let dy = axis_step(&mut self.offset_y, &mut self.last_y, y);
        if dx == 0 && dy == 0 {
            return None;
        }

        Some(self.event_for(dx, dy))
    }

    fn event_for(&self, dx: i32, dy: i32) -> SceneEvent {
        match self.mode {
            ControlMode::TranslateXY => SceneEvent::Translate {
                x: f64::from(-dx * 2),
                y: f64::from(-dy * 2),
                z: 0.0,
            },
            ControlMode::TranslateZ => SceneEvent::Translate {
                x: 0.0,
                y: 0.0,
                z: f64::from(-dy * 2),
            },
            ControlMode::RotateXY => SceneEvent::Rotate {
                x: wrap_degrees(-dy * 2),
                y: wrap_degrees(dx * 2),
                z: 0,
            },
            ControlMode::RotateZ => SceneEvent::Rotate {
                x: 0,
                y: 0,
                z: wrap_degrees(dx * 2),
            },
        }
    }
}

/// One axis of hysteresis: buffer while below the threshold, otherwise emit and reset
fn axis_step(offset: &mut f64, last: &mut f64, current: f64) -> i32 {
    if offset.abs() < DRAG_THRESHOLD {
        *offset += *last - current;
        return 0;
    }

    let steps = round_half_up((*last - current) / DRAG_THRESHOLD);
    *last = current;
    *offset = 0.0;
    steps
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn wrap_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

impl EventGenerator for PointerDragGenerator {
    fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Err(Error::AlreadyAttached);
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
        self.in_progress = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn on_input(&mut self, input: &InputEvent) -> Option<SceneEvent> {
        if let InputEvent::Mode(mode) = input {
            self.set_mode(*mode);
            return None;
        }
        if !self.attached {
            return None;
        }

        match *input {
            InputEvent::Press { x, y } => {
                self.press(x, y);
                None
            }
            InputEvent::Move { x, y } => self.drag(x, y),
            InputEvent::Release { .. } => {
                self.in_progress = false;
                None
            }
            InputEvent::Tick(_) | InputEvent::Mode(_) => None,
        }
    }
}
