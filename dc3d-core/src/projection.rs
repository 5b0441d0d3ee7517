/// Perspective projection from scene space onto the drawing surface
use nalgebra::{Point2, Point3};

use crate::geometry::{Polygon, ScreenPolygon};

pub const DEFAULT_VIEWPOINT: f64 = 500.0;
pub const DEFAULT_DISTANCE: f64 = 500.0;

/// Perspective divide with the viewer on the negative z axis.
///
/// Points with `z == -distance` divide by zero. The resulting infinities or NaNs are handed
/// on unchanged, the projector does not clamp them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub viewpoint: f64,
    pub distance: f64,
}

impl Projector {
    pub fn new(viewpoint: f64, distance: f64) -> Self {
        Self { viewpoint, distance }
    }

    /// Project a 3D point onto a surface of the given size; the origin lands in its centre
    pub fn project(&self, point: &Point3<f64>, width: f64, height: f64) -> Point2<f64> {
        let depth = point.z + self.distance;
        Point2::new(
            self.viewpoint * point.x / depth + width / 2.0,
            self.viewpoint * point.y / depth + height / 2.0,
        )
    }

    pub fn project_polygon(&self, polygon: &Polygon, width: f64, height: f64) -> ScreenPolygon {
        let points = polygon
            .points()
            .iter()
            .map(|point| self.project(point, width, height))
            .collect();
        ScreenPolygon::new(points, polygon.colors().to_vec())
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPOINT, DEFAULT_DISTANCE)
    }
}
