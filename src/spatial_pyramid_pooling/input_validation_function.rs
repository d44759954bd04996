use super::*;

/// Validates that the caller's `num_tot_bins` agrees with the pyramid.
///
/// # Errors
///
/// Returns `SppError::InvalidArgument` if `num_tot_bins` differs from the sum of
/// `rows * cols` over all levels.
pub fn validate_total_bins(num_tot_bins: usize, levels: &PyramidLevels) -> Result<(), SppError> {
    if num_tot_bins != levels.total_bins() {
        return Err(SppError::InvalidArgument(format!(
            "numTotBins ({}) does not match the {} bins of the {} pyramid level(s)",
            num_tot_bins,
            levels.total_bins(),
            levels.len()
        )));
    }
    Ok(())
}

/// Validates that all dimensions of the feature map are greater than zero.
///
/// # Errors
///
/// Returns `SppError::InvalidArgument` if any dimension is 0.
pub fn validate_all_dims_positive(shape: &[usize]) -> Result<(), SppError> {
    if !shape.iter().all(|&dim| dim > 0) {
        return Err(SppError::InvalidArgument(format!(
            "All dimensions of the feature map [size, depth, height, width] must be greater than zero. Got: {:?}",
            shape
        )));
    }
    Ok(())
}

/// Validates that the pooled tensor is `[num_rois, num_tot_bins, depth]`.
///
/// # Errors
///
/// Returns `SppError::InvalidArgument` if the shape differs.
pub fn validate_pooled_shape(
    pooled_shape: &[usize],
    num_rois: usize,
    num_tot_bins: usize,
    depth: usize,
    tensor_name: &str,
) -> Result<(), SppError> {
    let expected = [num_rois, num_tot_bins, depth];
    if pooled_shape != expected {
        return Err(SppError::InvalidArgument(format!(
            "{} must have shape [numROIs, numTotBins, depth] = {:?}, got {:?}",
            tensor_name, expected, pooled_shape
        )));
    }
    Ok(())
}

/// Validates that the input gradient has exactly the shape of the feature map.
///
/// # Errors
///
/// Returns `SppError::InvalidArgument` if the shapes differ.
pub fn validate_same_shape(grad_shape: &[usize], data_shape: &[usize]) -> Result<(), SppError> {
    if grad_shape != data_shape {
        return Err(SppError::InvalidArgument(format!(
            "input gradient shape {:?} must match the feature map shape {:?}",
            grad_shape, data_shape
        )));
    }
    Ok(())
}
