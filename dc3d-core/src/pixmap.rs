/// Software RGBA surface with scanline polygon filling
use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use nalgebra::Point2;

use crate::base64;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::surface::{Capabilities, FillStyle, LinearGradient, OffscreenSurface, Surface};

/// An in-memory RGBA8 image (straight alpha) that behaves like a canvas 2D context.
///
/// Paths are filled with the non-zero winding rule, sampled at pixel centres, without
/// anti-aliasing. Subpaths are closed implicitly when filled.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
    subpaths: Vec<Vec<Point2<f64>>>,
}

impl Pixmap {
    /// A fully transparent pixmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            subpaths: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row by row
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[idx..idx + 4]);
        Some(rgba)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| Error::Surface("pixel buffer does not match its size".to_string()))?;
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Source-over blend of `color` into one pixel
    fn blend(&mut self, x: usize, y: usize, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let idx = (y * self.width as usize + x) * 4;
        let dst = &mut self.data[idx..idx + 4];

        let src_a = color.a;
        let dst_a = f64::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |src: u8, dst: u8| {
            let c = (f64::from(src) * src_a + f64::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };

        dst[0] = channel(color.r, dst[0]);
        dst[1] = channel(color.g, dst[1]);
        dst[2] = channel(color.b, dst[2]);
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Horizontal pixel spans covered by the current path, as `(y, x_start, x_end)`
    fn spans(&self) -> Vec<(usize, usize, usize)> {
        let mut edges = Vec::new();
        for subpath in self.subpaths.iter().filter(|s| s.len() > 1) {
            for (i, from) in subpath.iter().enumerate() {
                let to = subpath[(i + 1) % subpath.len()];
                if from.y != to.y {
                    edges.push((*from, to));
                }
            }
        }

        let mut spans = Vec::new();
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in 0..self.height as usize {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for (from, to) in &edges {
                let (upward, low, high) = if from.y < to.y {
                    (1, from, to)
                } else {
                    (-1, to, from)
                };
                if yc >= low.y && yc < high.y {
                    let x = low.x + (yc - low.y) * (high.x - low.x) / (high.y - low.y);
                    crossings.push((x, upward));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    let start = pixel_column(pair[0].0, self.width);
                    let end = pixel_column(pair[1].0, self.width);
                    if start < end {
                        spans.push((y, start, end));
                    }
                }
            }
        }
        spans
    }

    fn fill_gradient(&mut self, spans: &[(usize, usize, usize)], gradient: &LinearGradient) {
        let axis = gradient.end - gradient.start;
        let length_sq = axis.norm_squared();
        if length_sq == 0.0 || !length_sq.is_finite() {
            // A canvas paints nothing for a zero length gradient
            return;
        }

        for &(y, start, end) in spans {
            for x in start..end {
                let sample = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                let offset = (sample - gradient.start).dot(&axis) / length_sq;
                if let Some(color) = gradient.color_at(offset) {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

/// First pixel whose centre lies at or right of `x`
fn pixel_column(x: f64, width: u32) -> usize {
    (x - 0.5).ceil().clamp(0.0, f64::from(width)) as usize
}

/// Canvas semantics: path calls with non-finite coordinates are dropped
fn is_drawable(point: &Point2<f64>) -> bool {
    let finite = point.x.is_finite() && point.y.is_finite();
    if !finite {
        log::warn!("skipping non-finite path point ({}, {})", point.x, point.y);
    }
    finite
}

impl Surface for Pixmap {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Point2<f64>) {
        if is_drawable(&point) {
            self.subpaths.push(vec![point]);
        }
    }

    fn line_to(&mut self, point: Point2<f64>) {
        if !is_drawable(&point) {
            return;
        }
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    fn fill(&mut self, style: &FillStyle) -> Result<()> {
        let spans = self.spans();
        match style {
            FillStyle::Solid(color) => {
                for &(y, start, end) in &spans {
                    for x in start..end {
                        self.blend(x, y, *color);
                    }
                }
            }
            FillStyle::Linear(gradient) => self.fill_gradient(&spans, gradient),
        }
        Ok(())
    }
}

impl OffscreenSurface for Pixmap {
    fn create(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Surface(format!(
                "cannot create a {width}x{height} pixmap"
            )));
        }
        Ok(Self::new(width, height))
    }

    fn to_data_uri(&self) -> Result<String> {
        Ok(base64::data_uri("image/png", &self.encode_png()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(pixmap: &mut Pixmap, points: &[(f64, f64)]) {
        pixmap.begin_path();
        pixmap.move_to(Point2::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            pixmap.line_to(Point2::new(x, y));
        }
    }

    #[test]
    fn test_fill_rectangle() {
        let mut pixmap = Pixmap::new(10, 10);
        path(&mut pixmap, &[(2.0, 2.0), (6.0, 2.0), (6.0, 5.0), (2.0, 5.0)]);
        pixmap.fill(&FillStyle::Solid(Color::rgb(255, 0, 0))).unwrap();

        assert_eq!(pixmap.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(5, 4), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(6, 4), Some([0, 0, 0, 0]));
        assert_eq!(pixmap.pixel(3, 5), Some([0, 0, 0, 0]));
        assert_eq!(pixmap.pixel(1, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_triangle_winding_either_way() {
        for points in [
            [(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)],
            [(0.0, 0.0), (0.0, 8.0), (8.0, 0.0)],
        ] {
            let mut pixmap = Pixmap::new(8, 8);
            path(&mut pixmap, &points);
            pixmap.fill(&FillStyle::Solid(Color::BLACK)).unwrap();
            assert_eq!(pixmap.pixel(1, 1), Some([0, 0, 0, 255]));
            assert_eq!(pixmap.pixel(7, 7), Some([0, 0, 0, 0]));
        }
    }

    #[test]
    fn test_alpha_blending() {
        let mut pixmap = Pixmap::new(2, 2);
        path(&mut pixmap, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        pixmap.fill(&FillStyle::Solid(Color::rgb(0, 0, 255))).unwrap();
        pixmap.fill(&FillStyle::Solid(Color::new(255, 0, 0, 0.5))).unwrap();
        assert_eq!(pixmap.pixel(0, 0), Some([128, 0, 128, 255]));
    }

    #[test]
    fn test_linear_gradient_fill() {
        let mut pixmap = Pixmap::new(10, 1);
        path(&mut pixmap, &[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        let gradient = LinearGradient::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
            .with_stop(0.0, Color::rgb(0, 0, 0))
            .with_stop(1.0, Color::rgb(200, 0, 0));
        pixmap.fill(&FillStyle::Linear(gradient)).unwrap();

        assert_eq!(pixmap.pixel(0, 0), Some([10, 0, 0, 255]));
        assert_eq!(pixmap.pixel(9, 0), Some([190, 0, 0, 255]));
    }

    #[test]
    fn test_zero_length_gradient_paints_nothing() {
        let mut pixmap = Pixmap::new(4, 4);
        path(&mut pixmap, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let gradient = LinearGradient::new(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0))
            .with_stop(0.0, Color::BLACK);
        pixmap.fill(&FillStyle::Linear(gradient)).unwrap();
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut pixmap = Pixmap::new(4, 4);
        path(&mut pixmap, &[(0.0, 0.0), (f64::INFINITY, 2.0), (f64::NAN, 1.0)]);
        pixmap.fill(&FillStyle::Solid(Color::BLACK)).unwrap();
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_png_data_uri() {
        let pixmap = Pixmap::create(3, 2).unwrap();
        let uri = pixmap.to_data_uri().unwrap();
        // PNG signature, base64 encoded
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert!(Pixmap::create(0, 2).is_err());
    }
}
