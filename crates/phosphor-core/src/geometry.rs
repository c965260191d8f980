//! Points, cell metrics and the viewport in virtual pixels.

use std::ops::{Add, AddAssign, Mul, Sub};

/// Horizontal advance of one glyph as a fraction of the font size.
pub const GLYPH_ADVANCE_RATIO: f32 = 0.6;

/// Lengths at or below this are treated as zero when normalizing.
const NORMALIZE_EPSILON: f32 = 1e-6;

/// Fraction of a cell a point may fall short of a cell edge and still
/// count as inside that cell. Absorbs f32 rounding in `n * width`.
const CELL_EDGE_EPSILON: f32 = 1e-3;

/// A 2D vector in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for (near) zero length.
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > NORMALIZE_EPSILON {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of one terminal cell in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl CellMetrics {
    /// Cells one glyph advance wide and one font size tall.
    pub fn from_font_size(font_size_px: f32) -> Self {
        Self {
            width: font_size_px * GLYPH_ADVANCE_RATIO,
            height: font_size_px,
        }
    }

    /// Center of the cell at `(column, row)`.
    pub fn cell_center(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(
            (column as f32 + 0.5) * self.width,
            (row as f32 + 0.5) * self.height,
        )
    }

    /// Cell containing `point`, or `None` for negative or non-finite points.
    ///
    /// A point a rounding error short of a cell edge belongs to the cell
    /// that starts at that edge.
    pub fn cell_at(&self, point: Vec2) -> Option<(u16, u16)> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / self.width + CELL_EDGE_EPSILON).floor();
        let row = (point.y / self.height + CELL_EDGE_EPSILON).floor();
        if column > u16::MAX as f32 || row > u16::MAX as f32 {
            return None;
        }
        Some((column as u16, row as u16))
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::from_font_size(24.0)
    }
}

/// The drawable area: a grid of cells plus their pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub columns: u16,
    pub rows: u16,
    pub metrics: CellMetrics,
}

impl Viewport {
    pub fn new(columns: u16, rows: u16, metrics: CellMetrics) -> Self {
        Self {
            columns,
            rows,
            metrics,
        }
    }

    /// Width in virtual pixels.
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.metrics.width
    }

    /// Height in virtual pixels.
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.metrics.height
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
        assert_eq!(Vec2::new(1e-9, 0.0).normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_cell_metrics_from_font_size() {
        let m = CellMetrics::from_font_size(24.0);
        assert!((m.width - 14.4).abs() < 1e-5);
        assert_eq!(m.height, 24.0);
    }

    #[test]
    fn test_cell_center_maps_back_to_cell() {
        let m = CellMetrics::default();
        let center = m.cell_center(7, 3);
        assert_eq!(m.cell_at(center), Some((7, 3)));
    }

    #[test]
    fn test_cell_at_rejects_offscreen() {
        let m = CellMetrics::default();
        assert_eq!(m.cell_at(Vec2::new(-0.1, 5.0)), None);
        assert_eq!(m.cell_at(Vec2::new(f32::NAN, 5.0)), None);
        assert_eq!(m.cell_at(Vec2::new(1e12, 5.0)), None);
    }

    #[test]
    fn test_cell_at_absorbs_rounding_at_edges() {
        let m = CellMetrics::default();
        let edge = 40.0 * m.width;
        assert_eq!(m.cell_at(Vec2::new(edge - 1e-4, 0.0)), Some((40, 0)));
        assert_eq!(m.cell_at(Vec2::new(edge, 0.0)), Some((40, 0)));
        assert_eq!(m.cell_at(Vec2::new(edge - 1.0, 0.0)), Some((39, 0)));
        assert_eq!(m.cell_at(Vec2::new(0.0, 3.0 * m.height - 1e-4)), Some((0, 3)));
    }

    #[test]
    fn test_viewport_pixel_size() {
        let v = Viewport::new(80, 24, CellMetrics::from_font_size(10.0));
        assert!((v.width() - 480.0).abs() < 1e-3);
        assert!((v.height() - 240.0).abs() < 1e-3);
        assert!(!v.is_empty());
        assert!(Viewport::new(0, 24, CellMetrics::default()).is_empty());
    }
}
