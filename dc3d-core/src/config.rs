/// Renderer configuration, fixed for the renderer's lifetime
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::projection::{DEFAULT_DISTANCE, DEFAULT_VIEWPOINT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub viewpoint: f64,
    pub distance: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            background: Color::WHITE,
            viewpoint: DEFAULT_VIEWPOINT,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl RenderConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// JSON file; fields that are left out keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::Config(format!("width must be positive, got {}", self.width)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::Config(format!("height must be positive, got {}", self.height)));
        }
        if !self.viewpoint.is_finite() || !self.distance.is_finite() {
            return Err(Error::Config("viewpoint and distance must be finite".to_string()));
        }
        Ok(())
    }
}
