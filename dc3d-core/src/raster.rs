/// Live raster output onto a path-filling surface
use nalgebra::Point2;

use crate::driver::OutputDriver;
use crate::error::{Error, Result};
use crate::geometry::ScreenPolygon;
use crate::surface::{Capabilities, FillStyle, LinearGradient, Surface};

/// Draws each polygon as a closed, filled path.
///
/// A single colour fills flat. With more colours, shading is approximated by two fills over the
/// same path: a main gradient from point 0 to point 1 (colours 0 and 1), then an overlay fading
/// colour 2 out from point 2 towards the midpoint of points 0 and 1. Only the first three
/// colours are read, so polygons with more than three distinct vertex colours are not shaded
/// faithfully.
pub struct RasterDriver<S: Surface> {
    surface: S,
}

impl<S: Surface> RasterDriver<S> {
    /// Fails when the surface cannot fill paths or linear gradients
    pub fn new(surface: S) -> Result<Self> {
        let caps = surface.capabilities();
        if !caps.contains(Capabilities::PATH_FILL) {
            return Err(Error::MissingCapability("path fill"));
        }
        if !caps.contains(Capabilities::LINEAR_GRADIENT) {
            return Err(Error::MissingCapability("linear gradient"));
        }
        Ok(Self { surface })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn trace_path(&mut self, points: &[Point2<f64>]) {
        self.surface.begin_path();
        self.surface.move_to(points[0]);
        for point in &points[1..] {
            self.surface.line_to(*point);
        }
        self.surface.line_to(points[0]);
    }
}

/// The two gradient passes used for shaded polygons
fn shading_passes(polygon: &ScreenPolygon) -> Option<(LinearGradient, LinearGradient)> {
    let [p0, p1, p2, ..] = polygon.points[..] else {
        return None;
    };
    let [c0, c1, c2, ..] = polygon.colors[..] else {
        return None;
    };

    let main = LinearGradient::new(p0, p1)
        .with_stop(0.0, c0)
        .with_stop(1.0, c1);

    let midpoint = Point2::new((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0);
    let overlay = LinearGradient::new(p2, midpoint)
        .with_stop(0.0, c2)
        .with_stop(1.0, c2.with_alpha(0.0));

    Some((main, overlay))
}

impl<S: Surface> OutputDriver for RasterDriver<S> {
    fn begin(&mut self, _width: f64, _height: f64) -> Result<()> {
        Ok(())
    }

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()> {
        let (Some(_), Some(first_color)) = (polygon.points.first(), polygon.colors.first()) else {
            return Ok(());
        };

        self.trace_path(&polygon.points);

        if polygon.colors.len() == 1 {
            return self.surface.fill(&FillStyle::Solid(*first_color));
        }

        match shading_passes(polygon) {
            Some((main, overlay)) => {
                self.surface.fill(&FillStyle::Linear(main))?;
                self.surface.fill(&FillStyle::Linear(overlay))
            }
            None => {
                log::warn!(
                    "shaded polygon with {} points and {} colours, filling flat",
                    polygon.points.len(),
                    polygon.colors.len()
                );
                self.surface.fill(&FillStyle::Solid(*first_color))
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
