use super::*;

/// One level of the pyramid: the grid a ROI is split into.
///
/// # Fields
///
/// - `rows` - Number of bins along the height of the ROI
/// - `cols` - Number of bins along the width of the ROI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PyramidLevel {
    rows: usize,
    cols: usize,
}

impl PyramidLevel {
    /// Creates a level with a `rows` x `cols` grid.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If either side of the grid is zero or the bin count
    ///   does not fit in `usize`
    pub fn new(rows: usize, cols: usize) -> Result<Self, SppError> {
        if rows == 0 || cols == 0 {
            return Err(SppError::InvalidArgument(format!(
                "pyramid level grid must be at least 1x1, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(SppError::InvalidArgument(format!(
                "pyramid level grid {}x{} has too many bins",
                rows, cols
            )));
        }
        Ok(PyramidLevel { rows, cols })
    }

    /// Creates a square `size` x `size` level.
    pub fn square(size: usize) -> Result<Self, SppError> {
        Self::new(size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of bins this level contributes to every ROI. Cannot overflow, `new` checks it.
    pub fn num_bins(&self) -> usize {
        self.rows * self.cols
    }
}

/// Ordered set of pyramid levels shared by every ROI.
///
/// Bins are numbered level after level in the order the levels were given, and
/// row-major inside a level. `offsets()[l]` is the index of the first bin of level `l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidLevels {
    levels: Vec<PyramidLevel>,
    offsets: Vec<usize>,
    total_bins: usize,
}

impl PyramidLevels {
    /// Builds the pyramid from explicit levels.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If `levels` is empty or the total bin count
    ///   overflows `usize`
    pub fn new(levels: Vec<PyramidLevel>) -> Result<Self, SppError> {
        if levels.is_empty() {
            return Err(SppError::InvalidArgument(
                "at least one pyramid level is required".to_string(),
            ));
        }

        let mut offsets = Vec::with_capacity(levels.len());
        let mut total_bins: usize = 0;
        for level in &levels {
            offsets.push(total_bins);
            total_bins = total_bins.checked_add(level.num_bins()).ok_or_else(|| {
                SppError::InvalidArgument(format!(
                    "pyramid of {} level(s) has too many bins",
                    levels.len()
                ))
            })?;
        }

        Ok(PyramidLevels {
            levels,
            offsets,
            total_bins,
        })
    }

    /// Builds a pyramid of square levels, e.g. `[1, 2, 4]` for 1x1, 2x2 and 4x4 grids.
    pub fn from_square_sizes(sizes: &[usize]) -> Result<Self, SppError> {
        let levels = sizes
            .iter()
            .map(|&size| PyramidLevel::square(size))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    /// Builds the pyramid from a level tensor as handed over by a host binding.
    ///
    /// A tensor of shape `(1, numLevels)` holds one square size per level, a tensor of
    /// shape `(2, numLevels)` holds the rows in its first row and the cols in its second.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If the tensor has another row count or an entry
    ///   is not a positive integer
    pub fn from_tensor<T: SppFloat>(levels: ArrayView2<T>) -> Result<Self, SppError> {
        let (descriptor_rows, num_levels) = levels.dim();
        if descriptor_rows != 1 && descriptor_rows != 2 {
            return Err(SppError::InvalidArgument(format!(
                "level tensor must have 1 or 2 rows, got shape {:?}",
                levels.shape()
            )));
        }

        let grid_side = |row: usize, l: usize| -> Result<usize, SppError> {
            let value = levels[[row, l]];
            match value.to_usize() {
                Some(side) if T::from_usize(side) == Some(value) => Ok(side),
                _ => Err(SppError::InvalidArgument(format!(
                    "level {} has a non-integral grid size {:?}",
                    l, value
                ))),
            }
        };

        let parsed = (0..num_levels)
            .map(|l| {
                let rows = grid_side(0, l)?;
                let cols = if descriptor_rows == 2 {
                    grid_side(1, l)?
                } else {
                    rows
                };
                PyramidLevel::new(rows, cols)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(parsed)
    }

    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Sum of `rows * cols` over every level, the `numTotBins` of the output layout.
    pub fn total_bins(&self) -> usize {
        self.total_bins
    }

    /// Iterates every bin of the pyramid as `(flat_bin, level, bin_row, bin_col)`,
    /// in output order.
    pub fn bins(&self) -> impl Iterator<Item = (usize, PyramidLevel, usize, usize)> + '_ {
        self.levels
            .iter()
            .zip(self.offsets.iter())
            .flat_map(|(&level, &offset)| {
                (0..level.rows()).flat_map(move |bin_row| {
                    (0..level.cols()).map(move |bin_col| {
                        (offset + bin_row * level.cols() + bin_col, level, bin_row, bin_col)
                    })
                })
            })
    }
}
