/// Drawing surface abstraction used by the raster drivers
use bitflags::bitflags;
use nalgebra::Point2;

use crate::color::Color;
use crate::error::Result;

bitflags! {
    /// What a surface can do. Drivers check this once, when they are created.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const PATH_FILL = 1 << 0;
        const LINEAR_GRADIENT = 1 << 1;
        const IMAGE_EXPORT = 1 << 2;
    }
}

/// A linear gradient between two surface points.
///
/// Stops are `(offset, colour)` pairs with offsets in `[0, 1]`, in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub stops: Vec<(f64, Color)>,
}

impl LinearGradient {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Colour at `offset` along the axis, interpolated between neighbouring stops
    pub fn color_at(&self, offset: f64) -> Option<Color> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        if offset <= first.0 {
            return Some(first.1);
        }
        if offset >= last.0 {
            return Some(last.1);
        }

        let pair = self
            .stops
            .windows(2)
            .find(|pair| offset >= pair[0].0 && offset <= pair[1].0)?;
        let (from, to) = (pair[0], pair[1]);
        let span = to.0 - from.0;
        let t = if span > 0.0 { (offset - from.0) / span } else { 1.0 };
        Some(mix(from.1, to.1, t))
    }
}

fn mix(from: Color, to: Color, t: f64) -> Color {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as i32;
    Color::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
        from.a + (to.a - from.a) * t,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    Solid(Color),
    Linear(LinearGradient),
}

/// A 2D target with path filling, modelled on the canvas 2D context
pub trait Surface {
    fn capabilities(&self) -> Capabilities;

    /// Discard the current path
    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point2<f64>);

    fn line_to(&mut self, point: Point2<f64>);

    /// Fill the current path. The path is kept, so it can be filled again.
    fn fill(&mut self, style: &FillStyle) -> Result<()>;
}

/// A surface that can be created off screen and turned into an image
pub trait OffscreenSurface: Surface + Sized {
    fn create(width: u32, height: u32) -> Result<Self>;

    /// The surface contents as a `data:image/png;base64,...` URI
    fn to_data_uri(&self) -> Result<String>;
}
