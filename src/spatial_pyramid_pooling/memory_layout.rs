//! Views over caller-owned buffers in the host's column-major layout.
//!
//! A host such as MATLAB stores the feature map as `(height, width, depth, size)` with the
//! first axis fastest. The operator indexes tensors as `[size, depth, height, width]`; the
//! functions here reinterpret the host buffer in place, without copying.

use super::*;
use ndarray::ShapeBuilder;

/// Dimensions of a feature map as the host describes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDims {
    pub height: usize,
    pub width: usize,
    pub depth: usize,
    pub size: usize,
}

impl MapDims {
    pub fn new(height: usize, width: usize, depth: usize, size: usize) -> Self {
        MapDims {
            height,
            width,
            depth,
            size,
        }
    }

    /// Element count of a contiguous buffer holding the map.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If the count does not fit in `usize`
    pub fn element_count(&self) -> Result<usize, SppError> {
        element_count(
            &[self.height, self.width, self.depth, self.size],
            "feature map",
        )
    }

    /// Shape in operator axis order, `[size, depth, height, width]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.size, self.depth, self.height, self.width]
    }
}

fn element_count(dims: &[usize], buffer_name: &str) -> Result<usize, SppError> {
    dims.iter()
        .try_fold(1usize, |count, &dim| count.checked_mul(dim))
        .ok_or_else(|| {
            SppError::InvalidArgument(format!(
                "{} dimensions {:?} overflow the addressable size",
                buffer_name, dims
            ))
        })
}

fn check_len(actual: usize, expected: usize, buffer_name: &str) -> Result<(), SppError> {
    if actual != expected {
        return Err(SppError::InvalidArgument(format!(
            "{} holds {} element(s) but {} are required",
            buffer_name, actual, expected
        )));
    }
    Ok(())
}

fn shape_error(err: ShapeError) -> SppError {
    SppError::InvalidArgument(format!("buffer does not fit the requested shape: {}", err))
}

/// Views a column-major `(height, width, depth, size)` buffer as `[size, depth, height, width]`.
///
/// # Errors
///
/// - `SppError::InvalidArgument` - If `buffer.len()` differs from `dims.element_count()`
///   or that count overflows
pub fn feature_map_view<T>(buffer: &[T], dims: MapDims) -> Result<ArrayView4<'_, T>, SppError> {
    check_len(buffer.len(), dims.element_count()?, "feature map buffer")?;
    let view = ArrayView4::from_shape(
        (dims.height, dims.width, dims.depth, dims.size).f(),
        buffer,
    )
    .map_err(shape_error)?;
    Ok(view.permuted_axes([3, 2, 0, 1]))
}

/// Mutable counterpart of [`feature_map_view`], used for the input gradient buffer.
pub fn feature_map_view_mut<T>(
    buffer: &mut [T],
    dims: MapDims,
) -> Result<ArrayViewMut4<'_, T>, SppError> {
    check_len(buffer.len(), dims.element_count()?, "input gradient buffer")?;
    let view = ArrayViewMut4::from_shape(
        (dims.height, dims.width, dims.depth, dims.size).f(),
        buffer,
    )
    .map_err(shape_error)?;
    Ok(view.permuted_axes([3, 2, 0, 1]))
}

/// Views a column-major `(1, 1, depth, numTotBins * numROIs)` pooled buffer as
/// `[numROIs, numTotBins, depth]`.
///
/// Channel is the fastest axis in both layouts, so this is a plain standard-layout view.
pub fn pooled_view<T>(
    buffer: &[T],
    depth: usize,
    num_tot_bins: usize,
    num_rois: usize,
) -> Result<ArrayView3<'_, T>, SppError> {
    let expected = element_count(&[depth, num_tot_bins, num_rois], "pooled buffer")?;
    check_len(buffer.len(), expected, "pooled buffer")?;
    ArrayView3::from_shape((num_rois, num_tot_bins, depth), buffer).map_err(shape_error)
}

/// Mutable counterpart of [`pooled_view`], used for the forward output buffer.
pub fn pooled_view_mut<T>(
    buffer: &mut [T],
    depth: usize,
    num_tot_bins: usize,
    num_rois: usize,
) -> Result<ArrayViewMut3<'_, T>, SppError> {
    let expected = element_count(&[depth, num_tot_bins, num_rois], "pooled buffer")?;
    check_len(buffer.len(), expected, "pooled buffer")?;
    ArrayViewMut3::from_shape((num_rois, num_tot_bins, depth), buffer).map_err(shape_error)
}
