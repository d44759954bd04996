use super::*;
use std::ops::Range;

/// Half-open pixel rectangle covered by one bin, already clipped to the feature map.
///
/// # Fields
///
/// - `row_start`, `row_end` - Rows `[row_start, row_end)` of the bin
/// - `col_start`, `col_end` - Columns `[col_start, col_end)` of the bin
///
/// An empty rectangle has `row_start == row_end` or `col_start == col_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BinRectangle {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl BinRectangle {
    /// The rectangle that covers no pixel.
    pub const EMPTY: BinRectangle = BinRectangle {
        row_start: 0,
        row_end: 0,
        col_start: 0,
        col_end: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    /// Number of pixels covered, 0 for an empty bin.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.row_end - self.row_start) * (self.col_end - self.col_start)
        }
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<usize> {
        self.col_start..self.col_end
    }

    /// Pixel coordinates `(row, col)` in scan order: row-major, then column.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| (row, col)))
    }
}

/// Splits `[start, end)` into `grid` parts and returns part `index`, clipped to `[0, limit)`.
///
/// A positive extent below one pixel is widened to one; a non-positive extent yields an
/// empty range.
fn split_axis(start: f64, end: f64, index: usize, grid: usize, limit: usize) -> Range<usize> {
    if !(end > start) {
        return 0..0;
    }

    let extent = (end - start).max(1.0);
    let origin = start.floor();
    let grid = grid as f64;

    let lo = origin + (index as f64 * extent / grid).floor();
    let hi = origin + ((index + 1) as f64 * extent / grid).ceil();

    let clip = |v: f64| v.clamp(0.0, limit as f64) as usize;
    let (lo, hi) = (clip(lo), clip(hi));
    if lo >= hi { 0..0 } else { lo..hi }
}

/// Computes the pixel rectangle of bin `(bin_row, bin_col)` of `level` inside `roi`.
///
/// Pure and stateless: any call order, from any thread, yields the same rectangle.
///
/// # Parameters
///
/// - `roi` - Region in zero-based, end-exclusive coordinates
/// - `level` - Grid the ROI is divided into
/// - `bin_row`, `bin_col` - Zero-based bin position inside the grid
/// - `map_height`, `map_width` - Spatial size of the feature map
///
/// # Returns
///
/// * `BinRectangle` - The clipped rectangle, [`BinRectangle::EMPTY`] for degenerate ROIs or
///   bins falling outside the map
pub fn resolve(
    roi: &Roi,
    level: PyramidLevel,
    bin_row: usize,
    bin_col: usize,
    map_height: usize,
    map_width: usize,
) -> BinRectangle {
    if roi.is_degenerate() {
        return BinRectangle::EMPTY;
    }

    let rows = split_axis(roi.y1, roi.y2, bin_row, level.rows(), map_height);
    let cols = split_axis(roi.x1, roi.x2, bin_col, level.cols(), map_width);
    if rows.is_empty() || cols.is_empty() {
        return BinRectangle::EMPTY;
    }

    BinRectangle {
        row_start: rows.start,
        row_end: rows.end,
        col_start: cols.start,
        col_end: cols.end,
    }
}

/// Resolves every bin of every ROI once, indexed as `[roi][flat_bin]`.
pub fn resolve_all(
    rois: &[Roi],
    levels: &PyramidLevels,
    map_height: usize,
    map_width: usize,
) -> Vec<Vec<BinRectangle>> {
    rois.iter()
        .map(|roi| {
            levels
                .bins()
                .map(|(_, level, bin_row, bin_col)| {
                    resolve(roi, level, bin_row, bin_col, map_height, map_width)
                })
                .collect()
        })
        .collect()
}
