/// Raster export: draw off screen, then deliver the image as a data URI
use crate::driver::{DataUriSink, OutputDriver};
use crate::error::{Error, Result};
use crate::geometry::ScreenPolygon;
use crate::raster::RasterDriver;
use crate::surface::{Capabilities, OffscreenSurface};

/// Wraps a [`RasterDriver`] around a fresh off-screen surface for every frame.
///
/// The surface encodes itself on `finish`; the resulting URI goes to the sink.
pub struct RasterExportDriver<S: OffscreenSurface> {
    raster: Option<RasterDriver<S>>,
    sink: Box<dyn DataUriSink>,
}

impl<S: OffscreenSurface> RasterExportDriver<S> {
    pub fn new(sink: impl DataUriSink + 'static) -> Self {
        Self {
            raster: None,
            sink: Box::new(sink),
        }
    }

    fn raster(&mut self) -> Result<&mut RasterDriver<S>> {
        self.raster
            .as_mut()
            .ok_or_else(|| Error::Surface("raster export used before begin".to_string()))
    }
}

impl<S: OffscreenSurface> OutputDriver for RasterExportDriver<S> {
    fn begin(&mut self, width: f64, height: f64) -> Result<()> {
        let surface = S::create(width.round() as u32, height.round() as u32)?;
        if !surface.capabilities().contains(Capabilities::IMAGE_EXPORT) {
            return Err(Error::MissingCapability("image export"));
        }
        let mut raster = RasterDriver::new(surface)?;
        raster.begin(width, height)?;
        self.raster = Some(raster);
        Ok(())
    }

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()> {
        self.raster()?.draw_polygon(polygon)
    }

    fn finish(&mut self) -> Result<()> {
        let mut raster = self
            .raster
            .take()
            .ok_or_else(|| Error::Surface("raster export finished before begin".to_string()))?;
        raster.finish()?;
        let uri = raster.surface().to_data_uri()?;
        log::debug!("raster export produced {} bytes of data URI", uri.len());
        self.sink.deliver(uri)
    }
}
