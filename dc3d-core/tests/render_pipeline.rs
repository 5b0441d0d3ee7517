use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use dc3d_core::{
    base64, Color, InputEvent, OutputDriver, Pixmap, Polygon, RasterDriver, RenderConfig,
    Renderer, Result, Scene, ScreenPolygon, SvgExportDriver, TimerGenerator,
};
use nalgebra::{Point2, Point3};

/// Keeps every polygon it is given
#[derive(Default)]
struct Capture {
    frames: usize,
    polygons: Vec<ScreenPolygon>,
}

impl OutputDriver for Capture {
    fn begin(&mut self, _width: f64, _height: f64) -> Result<()> {
        self.polygons.clear();
        Ok(())
    }

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()> {
        self.polygons.push(polygon.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

fn red_triangle_scene() -> Scene {
    let triangle = Polygon::flat(
        vec![
            Point3::new(0.0, 0.0, 100.0),
            Point3::new(50.0, 0.0, 100.0),
            Point3::new(0.0, 50.0, 100.0),
        ],
        Color::new(255, 0, 0, 1.0),
    )
    .unwrap();
    Scene::new(vec![triangle])
}

fn close(a: Point2<f64>, b: (f64, f64)) -> bool {
    (a.x - b.0).abs() < 0.01 && (a.y - b.1).abs() < 0.01
}

#[test_log::test]
fn test_single_triangle_frame() {
    let config = RenderConfig::new(200.0, 200.0);
    let mut renderer = Renderer::new(red_triangle_scene(), config, Capture::default()).unwrap();
    renderer.render().unwrap();

    let polygons = &renderer.driver().polygons;
    assert_eq!(polygons.len(), 2);
    assert_eq!(polygons[0], ScreenPolygon::rectangle(200.0, 200.0, Color::WHITE));

    let triangle = &polygons[1];
    assert_eq!(triangle.colors, vec![Color::rgb(255, 0, 0)]);
    assert!(close(triangle.points[0], (100.0, 100.0)));
    assert!(close(triangle.points[1], (141.67, 100.0)));
    assert!(close(triangle.points[2], (100.0, 141.67)));
}

#[test_log::test]
fn test_single_triangle_raster() {
    let config = RenderConfig::new(200.0, 200.0);
    let driver = RasterDriver::new(Pixmap::new(200, 200)).unwrap();
    let mut renderer = Renderer::new(red_triangle_scene(), config, driver).unwrap();
    renderer.render().unwrap();

    let pixmap = renderer.driver().surface();
    assert_eq!(pixmap.pixel(110, 110), Some([255, 0, 0, 255]));
    assert_eq!(pixmap.pixel(150, 150), Some([255, 255, 255, 255]));
    assert_eq!(pixmap.pixel(5, 5), Some([255, 255, 255, 255]));
}

#[test_log::test]
fn test_single_triangle_svg_export() {
    let delivered = Rc::new(RefCell::new(Vec::new()));
    let mut exporter = SvgExportDriver::new({
        let delivered = Rc::clone(&delivered);
        move |uri: String| delivered.borrow_mut().push(uri)
    });

    let config = RenderConfig::new(200.0, 200.0);
    let mut renderer = Renderer::new(red_triangle_scene(), config, Capture::default()).unwrap();
    renderer.export(&mut exporter).unwrap();

    let document = exporter.document();
    let background = "<polygon points=\"0,0 200,0 200,200 0,200\" \
                      style=\"fill: #FFFFFF; fill-opacity: 1; stroke: none;\" />\n";
    let triangle = "<polygon points=\"100,100 141.67,100 100,141.67\" \
                    style=\"fill: #FF0000; fill-opacity: 1; stroke: none;\" />\n";
    let background_at = document.find(background).expect("background polygon");
    let triangle_at = document.find(triangle).expect("triangle polygon");
    assert!(background_at < triangle_at);

    assert_eq!(
        *delivered.borrow(),
        vec![base64::data_uri("image/svg+xml", document.as_bytes())]
    );
    assert_eq!(renderer.driver().frames, 0);
}

#[test_log::test]
fn test_timer_drives_one_frame_per_firing() {
    let start = Instant::now();
    let interval = Duration::from_millis(10);
    let mut renderer =
        Renderer::new(Scene::cube(100.0), RenderConfig::default(), Capture::default()).unwrap();
    renderer
        .set_event_generator(Box::new(TimerGenerator::starting_at(start, interval)))
        .unwrap();

    let mut rendered = 0;
    for ms in 0..=50 {
        let tick = InputEvent::Tick(start + Duration::from_millis(ms));
        if renderer.handle_input(&tick).unwrap() {
            rendered += 1;
        }
    }
    assert_eq!(rendered, 5);
    assert_eq!(renderer.driver().frames, 5);

    // Rotation keeps every point on the cube's circumsphere
    for polygon in &renderer.scene().polygons {
        for point in polygon.points() {
            assert!((point.coords.norm() - 50.0 * 3f64.sqrt()).abs() < 1e-6);
        }
    }

    // Back to front after every frame
    let depths: Vec<f64> = renderer.scene().polygons.iter().map(|p| p.average_z()).collect();
    assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test_log::test]
fn test_degenerate_depth_reaches_driver() {
    let polygon = Polygon::flat(
        vec![
            Point3::new(10.0, 10.0, -500.0),
            Point3::new(20.0, 10.0, 0.0),
            Point3::new(10.0, 20.0, 0.0),
        ],
        Color::BLACK,
    )
    .unwrap();
    let mut renderer = Renderer::new(
        Scene::new(vec![polygon]),
        RenderConfig::new(100.0, 100.0),
        Capture::default(),
    )
    .unwrap();
    renderer.render().unwrap();

    let projected = &renderer.driver().polygons[1];
    assert!(!projected.points[0].x.is_finite());
    assert!(projected.points[1].x.is_finite());
}
