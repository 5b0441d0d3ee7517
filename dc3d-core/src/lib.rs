/// DC3D Core Library - Scene transforms, depth ordering, projection and output
///
/// This library holds the host independent rendering pipeline: the scene is rotated or
/// translated in place in response to events, sorted back to front, projected, and handed
/// polygon by polygon to an output driver that draws live or exports an image.

pub mod base64;
pub mod color;
pub mod config;
pub mod depth;
pub mod driver;
pub mod error;
pub mod event;
pub mod geometry;
pub mod pixmap;
pub mod pointer;
pub mod projection;
pub mod raster;
pub mod raster_export;
pub mod renderer;
pub mod surface;
pub mod svg;
pub mod timer;
pub mod transform;

// Re-export commonly used types
pub use color::Color;
pub use config::RenderConfig;
pub use driver::{DataUriSink, OutputDriver};
pub use error::{Error, Result};
pub use event::{ControlMode, EventGenerator, InputEvent, SceneEvent};
pub use geometry::{Polygon, Scene, ScreenPolygon};
pub use pixmap::Pixmap;
pub use pointer::PointerDragGenerator;
pub use projection::Projector;
pub use raster::RasterDriver;
pub use raster_export::RasterExportDriver;
pub use renderer::Renderer;
pub use surface::{Capabilities, FillStyle, LinearGradient, OffscreenSurface, Surface};
pub use svg::SvgExportDriver;
pub use timer::TimerGenerator;
pub use transform::{Transform, TrigTable};
