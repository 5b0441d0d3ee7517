/// Painter's algorithm ordering
///
/// Polygons are ordered by the mean z of their points, farthest first, so that nearer
/// polygons are drawn over farther ones. This is not a z-buffer: polygons that pass through
/// each other are drawn whole, one over the other.
use std::cmp::Ordering;

use crate::geometry::Scene;

/// Reorder `scene` from largest to smallest average z.
///
/// The sort is stable, polygons with equal depth keep their relative order.
pub fn sort(scene: &mut Scene) {
    let mut keyed: Vec<_> = scene
        .polygons
        .drain(..)
        .map(|polygon| (polygon.average_z(), polygon))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| farthest_first(*a, *b));

    scene.polygons.extend(keyed.into_iter().map(|(_, polygon)| polygon));
}

/// Descending depth. NaN depths rank as farthest and keep their relative order.
fn farthest_first(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Polygon;
    use nalgebra::Point3;

    fn polygon_at(z: [f64; 3], tag: i32) -> Polygon {
        let points = vec![
            Point3::new(0.0, 0.0, z[0]),
            Point3::new(1.0, 0.0, z[1]),
            Point3::new(0.0, 1.0, z[2]),
        ];
        Polygon::flat(points, Color::rgb(tag, 0, 0)).unwrap()
    }

    fn tags(scene: &Scene) -> Vec<u8> {
        scene.polygons.iter().map(|p| p.colors()[0].r).collect()
    }

    #[test]
    fn test_farthest_first() {
        let mut scene = Scene::new(vec![
            polygon_at([0.0, 0.0, 0.0], 1),
            polygon_at([100.0, 100.0, 100.0], 2),
            polygon_at([-50.0, 0.0, 50.0], 3),
            polygon_at([10.0, 20.0, 30.0], 4),
        ]);
        sort(&mut scene);
        assert_eq!(tags(&scene), vec![2, 4, 1, 3]);
        for pair in scene.polygons.windows(2) {
            assert!(pair[0].average_z() >= pair[1].average_z());
        }
    }

    #[test]
    fn test_equal_depth_keeps_order() {
        let mut scene = Scene::new(vec![
            polygon_at([5.0, 5.0, 5.0], 1),
            polygon_at([0.0, 0.0, 15.0], 2),
            polygon_at([9.0, 9.0, 9.0], 3),
            polygon_at([15.0, 0.0, 0.0], 4),
        ]);
        sort(&mut scene);
        assert_eq!(tags(&scene), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_nan_depths_are_drawn_first() {
        let polygons = (0..64)
            .map(|i| {
                let z = if i % 7 == 0 { f64::NAN } else { f64::from(i % 13) };
                polygon_at([z, z, z], i)
            })
            .collect();
        let mut scene = Scene::new(polygons);
        sort(&mut scene);

        assert_eq!(scene.len(), 64);
        let nan_tags: Vec<u8> = (0..64).step_by(7).map(|i| i as u8).collect();
        assert_eq!(tags(&scene)[..nan_tags.len()], nan_tags[..]);

        let rest = &scene.polygons[nan_tags.len()..];
        assert!(rest.iter().all(|p| !p.average_z().is_nan()));
        for pair in rest.windows(2) {
            assert!(pair[0].average_z() >= pair[1].average_z());
        }
    }

    #[test]
    fn test_empty_scene() {
        let mut scene = Scene::default();
        sort(&mut scene);
        assert!(scene.is_empty());
    }
}
