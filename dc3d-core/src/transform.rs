/// In-place rotation and translation of scene points
use nalgebra::Point3;

use crate::geometry::Scene;

/// Sine and cosine for every whole degree from 0 to 360 inclusive
#[derive(Debug, Clone)]
pub struct TrigTable {
    sin: Vec<f64>,
    cos: Vec<f64>,
}

impl TrigTable {
    pub fn new() -> Self {
        let factor = std::f64::consts::TAU / 360.0;
        let (sin, cos) = (0..=360)
            .map(|degree| (factor * f64::from(degree)).sin_cos())
            .unzip();
        Self { sin, cos }
    }

    pub fn sin(&self, degrees: usize) -> f64 {
        self.sin[degrees]
    }

    pub fn cos(&self, degrees: usize) -> f64 {
        self.cos[degrees]
    }
}

impl Default for TrigTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce any whole-degree angle into the table's index range
fn table_index(degrees: i32) -> usize {
    degrees.rem_euclid(360) as usize
}

/// Rotation and translation applied to every point of a scene
#[derive(Debug, Clone, Default)]
pub struct Transform {
    trig: TrigTable,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            trig: TrigTable::new(),
        }
    }

    pub fn trig(&self) -> &TrigTable {
        &self.trig
    }

    /// Rotate every point about Z, then X, then Y.
    ///
    /// The three steps are successive 2D rotations of the evolving coordinates, so the order is
    /// part of the result. An axis with a zero angle is skipped.
    pub fn rotate(&self, scene: &mut Scene, rx: i32, ry: i32, rz: i32) {
        let (rx, ry, rz) = (table_index(rx), table_index(ry), table_index(rz));
        if rx == 0 && ry == 0 && rz == 0 {
            return;
        }

        for polygon in &mut scene.polygons {
            for point in polygon.points_mut() {
                *point = self.rotate_point(*point, rx, ry, rz);
            }
        }
    }

    fn rotate_point(&self, point: Point3<f64>, rx: usize, ry: usize, rz: usize) -> Point3<f64> {
        let (mut px, mut py, mut pz) = (point.x, point.y, point.z);

        if rz != 0 {
            let (sin, cos) = (self.trig.sin(rz), self.trig.cos(rz));
            let x = cos * px + sin * py;
            let y = -sin * px + cos * py;
            px = x;
            py = y;
        }

        if rx != 0 {
            let (sin, cos) = (self.trig.sin(rx), self.trig.cos(rx));
            let y = cos * py - sin * pz;
            let z = sin * py + cos * pz;
            py = y;
            pz = z;
        }

        if ry != 0 {
            let (sin, cos) = (self.trig.sin(ry), self.trig.cos(ry));
            let x = cos * px + sin * pz;
            let z = -sin * px + cos * pz;
            px = x;
            pz = z;
        }

        Point3::new(px, py, pz)
    }

    /// Shift every point by the given offsets
    pub fn translate(&self, scene: &mut Scene, tx: f64, ty: f64, tz: f64) {
        for polygon in &mut scene.polygons {
            for point in polygon.points_mut() {
                point.x += tx;
                point.y += ty;
                point.z += tz;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Polygon;

    fn single_point_scene(x: f64, y: f64, z: f64) -> Scene {
        let points = vec![
            Point3::new(x, y, z),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.0, 5.0, -6.0),
        ];
        Scene::new(vec![Polygon::flat(points, Color::BLACK).unwrap()])
    }

    fn assert_close(a: Point3<f64>, b: Point3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    /// Z, then X, then Y, written out with plain trigonometry
    fn reference(p: Point3<f64>, rx: i32, ry: i32, rz: i32) -> Point3<f64> {
        let rad = |d: i32| f64::from(d).to_radians();
        let (mut x, mut y, mut z) = (p.x, p.y, p.z);

        let (s, c) = rad(rz).sin_cos();
        (x, y) = (c * x + s * y, -s * x + c * y);

        let (s, c) = rad(rx).sin_cos();
        (y, z) = (c * y - s * z, s * y + c * z);

        let (s, c) = rad(ry).sin_cos();
        (x, z) = (c * x + s * z, -s * x + c * z);

        Point3::new(x, y, z)
    }

    #[test]
    fn test_trig_table_bounds() {
        let trig = TrigTable::new();
        assert_eq!(trig.sin(0), 0.0);
        assert_eq!(trig.cos(0), 1.0);
        assert!((trig.sin(90) - 1.0).abs() < 1e-12);
        assert!((trig.cos(180) + 1.0).abs() < 1e-12);
        assert!((trig.cos(360) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_matches_sequential_reference() {
        let transform = Transform::new();
        for &(rx, ry, rz) in &[(30, 0, 0), (0, 45, 0), (0, 0, 60), (10, 20, 30), (359, 181, 2)] {
            let mut scene = single_point_scene(3.0, -7.0, 11.0);
            let before = scene.clone();
            transform.rotate(&mut scene, rx, ry, rz);
            for (rotated, original) in scene.polygons[0]
                .points()
                .iter()
                .zip(before.polygons[0].points())
            {
                assert_close(*rotated, reference(*original, rx, ry, rz));
            }
        }
    }

    #[test]
    fn test_rotation_order_is_not_commutative() {
        let transform = Transform::new();
        let mut scene = single_point_scene(1.0, 0.0, 0.0);
        transform.rotate(&mut scene, 90, 0, 90);
        // Z first takes (1,0,0) to (0,-1,0), X then takes it to (0,0,-1)
        assert_close(scene.polygons[0].points()[0], Point3::new(0.0, 0.0, -1.0));

        // X first would leave (1,0,0) alone and Z would give (0,-1,0)
        let mut other_order = single_point_scene(1.0, 0.0, 0.0);
        transform.rotate(&mut other_order, 90, 0, 0);
        transform.rotate(&mut other_order, 0, 0, 90);
        assert_close(other_order.polygons[0].points()[0], Point3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let transform = Transform::new();
        let mut scene = single_point_scene(3.0, 4.0, 5.0);
        let before = scene.clone();
        transform.rotate(&mut scene, 0, 360, -720);
        assert_eq!(scene, before);
    }

    #[test]
    fn test_negative_angles_wrap() {
        let transform = Transform::new();
        let mut a = single_point_scene(3.0, 4.0, 5.0);
        let mut b = a.clone();
        transform.rotate(&mut a, -10, -20, -30);
        transform.rotate(&mut b, 350, 340, 330);
        assert_eq!(a, b);
    }

    #[test]
    fn test_translate() {
        let transform = Transform::new();
        let mut scene = single_point_scene(0.0, 0.0, 0.0);
        transform.translate(&mut scene, 1.5, -2.0, 10.0);
        assert_eq!(scene.polygons[0].points()[0], Point3::new(1.5, -2.0, 10.0));
        assert_eq!(scene.polygons[0].points()[2], Point3::new(-2.5, 3.0, 4.0));
    }
}
