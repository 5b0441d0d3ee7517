/// Vector export as an SVG 1.1 document, delivered base64 encoded
use crate::base64;
use crate::driver::{DataUriSink, OutputDriver};
use crate::error::Result;
use crate::geometry::ScreenPolygon;

/// Collects one `<polygon>` element per drawn polygon.
///
/// Only the first colour of each polygon is used; shading is not exported.
pub struct SvgExportDriver {
    header: String,
    elements: Vec<String>,
    sink: Box<dyn DataUriSink>,
}

impl SvgExportDriver {
    pub fn new(sink: impl DataUriSink + 'static) -> Self {
        Self {
            header: String::new(),
            elements: Vec::new(),
            sink: Box::new(sink),
        }
    }

    /// The complete document for the polygons drawn so far
    pub fn document(&self) -> String {
        let mut svg = self.header.clone();
        svg.push_str("<defs></defs>\n");
        for element in &self.elements {
            svg.push_str(element);
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Round half up to two decimals, printed without trailing zeros
fn coordinate(value: f64) -> f64 {
    // Adding 0.0 turns -0 into 0
    (value * 100.0 + 0.5).floor() / 100.0 + 0.0
}

fn style(polygon: &ScreenPolygon) -> String {
    match polygon.colors.first() {
        Some(color) => format!(
            "fill: {}; fill-opacity: {}; stroke: none;",
            color.to_hex(),
            color.a
        ),
        None => "fill: none; stroke: none;".to_string(),
    }
}

impl OutputDriver for SvgExportDriver {
    fn begin(&mut self, width: f64, height: f64) -> Result<()> {
        self.elements.clear();
        self.header = format!(
            "<?xml version=\"1.0\" ?>\n\
             <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n\
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\">\n"
        );
        Ok(())
    }

    fn draw_polygon(&mut self, polygon: &ScreenPolygon) -> Result<()> {
        let points = polygon
            .points
            .iter()
            .map(|point| format!("{},{}", coordinate(point.x), coordinate(point.y)))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements.push(format!(
            "<polygon points=\"{points}\" style=\"{}\" />\n",
            style(polygon)
        ));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let document = self.document();
        log::debug!(
            "svg export: {} polygons, {} bytes",
            self.elements.len(),
            document.len()
        );
        self.sink
            .deliver(base64::data_uri("image/svg+xml", document.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use nalgebra::Point2;

    use super::*;
    use crate::color::Color;

    #[test]
    fn test_coordinate_rounding() {
        assert_eq!(coordinate(141.666_666), 141.67);
        assert_eq!(coordinate(100.0), 100.0);
        assert_eq!(coordinate(-0.001).to_string(), "0");
        assert_eq!(coordinate(0.125), 0.13);
        assert_eq!(coordinate(-0.125), -0.12);
        assert!(coordinate(f64::NAN).is_nan());
    }

    #[test]
    fn test_document_layout() {
        let mut driver = SvgExportDriver::new(|_uri: String| {});
        driver.begin(200.0, 100.0).unwrap();
        driver
            .draw_polygon(&ScreenPolygon::new(
                vec![
                    Point2::new(100.0, 100.0),
                    Point2::new(141.666_666, 100.0),
                    Point2::new(100.0, 141.666_666),
                ],
                vec![Color::new(255, 0, 16, 0.5), Color::BLACK, Color::BLACK],
            ))
            .unwrap();

        let expected = "<?xml version=\"1.0\" ?>\n\
             <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n\
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" x=\"0\" y=\"0\" width=\"200\" height=\"100\">\n\
             <defs></defs>\n\
             <polygon points=\"100,100 141.67,100 100,141.67\" \
             style=\"fill: #FF0010; fill-opacity: 0.5; stroke: none;\" />\n\
             </svg>";
        assert_eq!(driver.document(), expected);
    }

    #[test]
    fn test_finish_delivers_base64_document() {
        let delivered = Rc::new(RefCell::new(None));
        let sink = {
            let delivered = Rc::clone(&delivered);
            move |uri: String| *delivered.borrow_mut() = Some(uri)
        };
        let mut driver = SvgExportDriver::new(sink);
        driver.begin(10.0, 10.0).unwrap();
        driver.finish().unwrap();

        let expected = base64::data_uri("image/svg+xml", driver.document().as_bytes());
        assert_eq!(delivered.borrow().as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn test_begin_starts_a_new_document() {
        let mut driver = SvgExportDriver::new(|_uri: String| {});
        driver.begin(10.0, 10.0).unwrap();
        driver
            .draw_polygon(&ScreenPolygon::rectangle(10.0, 10.0, Color::WHITE))
            .unwrap();
        driver.begin(10.0, 10.0).unwrap();
        assert!(!driver.document().contains("<polygon"));
    }
}
