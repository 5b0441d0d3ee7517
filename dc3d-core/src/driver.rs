/// Output driver contract shared by live drawing and the exporters
use crate::error::Result;
use crate::geometry::ScreenPolygon;

/// Receives one frame per render pass.
///
/// `begin` is called first with the viewport size, then `draw_polygon` once for the background
/// and once per scene polygon (farthest first), then `finish`.
pub trait OutputDriver {
    fn begin(&mut self, width: f64, height: f64) -> Result<()>;

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

/// Where export drivers hand their finished `data:` URI
pub trait DataUriSink {
    fn deliver(&mut self, uri: String) -> Result<()>;
}

impl<F> DataUriSink for F
where
    F: FnMut(String),
{
    fn deliver(&mut self, uri: String) -> Result<()> {
        self(uri);
        Ok(())
    }
}

impl<D: OutputDriver + ?Sized> OutputDriver for Box<D> {
    fn begin(&mut self, width: f64, height: f64) -> Result<()> {
        (**self).begin(width, height)
    }

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()> {
        (**self).draw_polygon(polygon)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
