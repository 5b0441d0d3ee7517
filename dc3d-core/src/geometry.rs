/// Geometry primitives for the scene and for projected output
use std::fs;
use std::path::Path;

use nalgebra::{Point2, Point3};
use serde::Deserialize;

use crate::color::Color;
use crate::error::{Error, Result};

/// A polygon in scene space.
///
/// `colors` holds either a single colour (flat shading) or one colour per point
/// (gradient shading).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point3<f64>>,
    colors: Vec<Color>,
}

impl Polygon {
    pub fn new(points: Vec<Point3<f64>>, colors: Vec<Color>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidPolygon(format!(
                "needs at least 3 points, got {}",
                points.len()
            )));
        }
        if colors.len() != 1 && colors.len() != points.len() {
            return Err(Error::InvalidPolygon(format!(
                "expected 1 or {} colours, got {}",
                points.len(),
                colors.len()
            )));
        }
        Ok(Self { points, colors })
    }

    /// Single coloured polygon
    pub fn flat(points: Vec<Point3<f64>>, color: Color) -> Result<Self> {
        Self::new(points, vec![color])
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.points
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn is_flat(&self) -> bool {
        self.colors.len() == 1
    }

    /// Arithmetic mean of the points' z coordinates
    pub fn average_z(&self) -> f64 {
        let sum: f64 = self.points.iter().map(|p| p.z).sum();
        sum / self.points.len() as f64
    }
}

/// A polygon after projection, in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPolygon {
    pub points: Vec<Point2<f64>>,
    pub colors: Vec<Color>,
}

impl ScreenPolygon {
    pub fn new(points: Vec<Point2<f64>>, colors: Vec<Color>) -> Self {
        Self { points, colors }
    }

    /// Axis aligned rectangle covering `(0, 0)` to `(width, height)`
    pub fn rectangle(width: f64, height: f64, color: Color) -> Self {
        Self {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(width, 0.0),
                Point2::new(width, height),
                Point2::new(0.0, height),
            ],
            colors: vec![color],
        }
    }
}

/// The mutable set of polygons being rendered.
///
/// Polygon order carries no meaning between frames, the depth sorter rewrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub polygons: Vec<Polygon>,
}

impl Scene {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Parse a scene from its JSON form:
    /// `[{"points": [{"x":..,"y":..,"z":..}, ..], "colors": [{"r":..,"g":..,"b":..,"a":..}, ..]}, ..]`
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Vec<RawPolygon> = serde_json::from_str(text)?;
        let polygons = raw
            .into_iter()
            .enumerate()
            .map(|(index, polygon)| {
                let points = polygon
                    .points
                    .into_iter()
                    .map(|p| Point3::new(p.x, p.y, p.z))
                    .collect();
                Polygon::new(points, polygon.colors).map_err(|e| match e {
                    Error::InvalidPolygon(reason) => {
                        Error::InvalidPolygon(format!("polygon {index}: {reason}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(polygons))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let scene = Self::from_json(&text)?;
        log::debug!("loaded {} polygons from {}", scene.len(), path.as_ref().display());
        Ok(scene)
    }

    /// A cube centred on the origin, one flat colour per face
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let p = Point3::new;
        let faces = [
            // Front
            ([p(-h, -h, -h), p(h, -h, -h), p(h, h, -h), p(-h, h, -h)], Color::rgb(204, 0, 0)),
            // Back
            ([p(-h, -h, h), p(-h, h, h), p(h, h, h), p(h, -h, h)], Color::rgb(78, 154, 6)),
            // Top
            ([p(-h, h, -h), p(h, h, -h), p(h, h, h), p(-h, h, h)], Color::rgb(52, 101, 164)),
            // Bottom
            ([p(-h, -h, -h), p(-h, -h, h), p(h, -h, h), p(h, -h, -h)], Color::rgb(237, 212, 0)),
            // Right
            ([p(h, -h, -h), p(h, -h, h), p(h, h, h), p(h, h, -h)], Color::rgb(117, 80, 123)),
            // Left
            ([p(-h, -h, -h), p(-h, h, -h), p(-h, h, h), p(-h, -h, h)], Color::rgb(245, 121, 0)),
        ];

        let polygons = faces
            .into_iter()
            .map(|(points, color)| Polygon {
                points: points.to_vec(),
                colors: vec![color],
            })
            .collect();
        Self::new(polygons)
    }
}

#[derive(Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Deserialize)]
struct RawPolygon {
    points: Vec<RawPoint>,
    colors: Vec<Color>,
}
