/// Half-block presentation of a pixmap in the terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use dc3d_core::Pixmap;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Maps between terminal cells and pixmap pixels.
///
/// Each cell shows two vertically stacked samples. The first `top` rows are left for the
/// status line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapping {
    pub cols: u16,
    pub rows: u16,
    pub top: u16,
    scale_x: f64,
    scale_y: f64,
}

impl CellMapping {
    pub fn new(pixmap_width: u32, pixmap_height: u32, cols: u16, rows: u16, top: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.saturating_sub(top).max(1);
        Self {
            cols,
            rows,
            top,
            scale_x: f64::from(pixmap_width) / f64::from(cols),
            scale_y: f64::from(pixmap_height) / (f64::from(rows) * 2.0),
        }
    }

    /// Pixmap position under the centre of a terminal cell
    pub fn cell_to_pixel(&self, column: u16, row: u16) -> (f64, f64) {
        let row = row.saturating_sub(self.top);
        (
            (f64::from(column) + 0.5) * self.scale_x,
            (f64::from(row) + 0.5) * 2.0 * self.scale_y,
        )
    }

    /// Pixel sampled for the upper (`half == 0`) or lower (`half == 1`) half of a cell
    fn sample(&self, column: u16, row: u16, half: u16) -> (u32, u32) {
        let x = (f64::from(column) + 0.5) * self.scale_x;
        let y = (f64::from(row) * 2.0 + f64::from(half) + 0.5) * self.scale_y;
        (x as u32, y as u32)
    }
}

/// Draws pixmaps into the terminal with truecolor half blocks
pub struct BlockRenderer {
    mapping: CellMapping,
}

impl BlockRenderer {
    pub fn new(mapping: CellMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &CellMapping {
        &self.mapping
    }

    pub fn resize(&mut self, mapping: CellMapping) {
        self.mapping = mapping;
    }

    pub fn draw<W: Write>(&self, writer: &mut W, pixmap: &Pixmap) -> std::io::Result<()> {
        let mut colors = (None, None);
        for row in 0..self.mapping.rows {
            writer.queue(cursor::MoveTo(0, row + self.mapping.top))?;
            for column in 0..self.mapping.cols {
                let upper = pixel_color(pixmap, self.mapping.sample(column, row, 0));
                let lower = pixel_color(pixmap, self.mapping.sample(column, row, 1));

                // Only emit colour changes
                if colors.0 != Some(upper) {
                    writer.queue(SetForegroundColor(upper))?;
                }
                if colors.1 != Some(lower) {
                    writer.queue(SetBackgroundColor(lower))?;
                }
                colors = (Some(upper), Some(lower));
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pixel colour composited over black; samples outside the pixmap are black
fn pixel_color(pixmap: &Pixmap, (x, y): (u32, u32)) -> Color {
    match pixmap.pixel(x, y) {
        Some([r, g, b, a]) => {
            let over_black = |c: u8| ((u16::from(c) * u16::from(a)) / 255) as u8;
            Color::Rgb {
                r: over_black(r),
                g: over_black(g),
                b: over_black(b),
            }
        }
        None => Color::Black,
    }
}
