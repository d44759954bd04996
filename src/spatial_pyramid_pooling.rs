use crate::error::SppError;
use log::{debug, trace};
use ndarray::{
    Array3, Array4, ArrayView2, ArrayView3, ArrayView4, ArrayViewMut2, ArrayViewMut3,
    ArrayViewMut4, Axis, ShapeError, s,
};
use num_traits::{Float, FromPrimitive};
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// Average pooling reduction engine
pub mod average_pooling;
/// Bin geometry resolver
pub mod bin_geometry;
/// Execution target and call-time options
pub mod execution_target;
/// Shape and argument validation
pub mod input_validation_function;
/// Max pooling reduction engine
pub mod max_pooling;
/// Host buffer views
pub mod memory_layout;
/// Pyramid level descriptors
pub mod pyramid_level;
/// ROI records and ROI tensor parsing
pub mod region_of_interest;
/// Stateful layer wrapper
pub mod spp_layer;

pub use bin_geometry::*;
pub use execution_target::*;
pub use memory_layout::*;
pub use pyramid_level::*;
pub use region_of_interest::*;
pub use spp_layer::*;

use input_validation_function::{
    validate_all_dims_positive, validate_pooled_shape, validate_same_shape, validate_total_bins,
};

/// Element types the operator runs on, in practice `f32` and `f64`.
pub trait SppFloat: Float + FromPrimitive + Debug + Send + Sync + 'static {}

impl<T> SppFloat for T where T: Float + FromPrimitive + Debug + Send + Sync + 'static {}

/// Reduction applied to every bin.
///
/// # Variants
///
/// - `Max` - maximum of the bin; backward routes the gradient to the first argmax
/// - `Average` - mean of the bin; backward spreads the gradient evenly over the bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolingMethod {
    Max,
    Average,
}

impl TryFrom<usize> for PoolingMethod {
    type Error = SppError;

    /// Decodes a host method code: 0 is max, 1 is average.
    fn try_from(code: usize) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PoolingMethod::Max),
            1 => Ok(PoolingMethod::Average),
            _ => Err(SppError::InvalidArgument(format!(
                "unsupported pooling method code {} (expected 0 for max or 1 for average)",
                code
            ))),
        }
    }
}

impl FromStr for PoolingMethod {
    type Err = SppError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "max" => Ok(PoolingMethod::Max),
            "avg" | "average" => Ok(PoolingMethod::Average),
            _ => Err(SppError::InvalidArgument(format!(
                "unsupported pooling method '{}' (expected 'max' or 'avg')",
                name
            ))),
        }
    }
}

impl Display for PoolingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolingMethod::Max => write!(f, "max"),
            PoolingMethod::Average => write!(f, "avg"),
        }
    }
}

fn log_degenerate_rois(rois: &[Roi]) {
    for (index, roi) in rois.iter().enumerate() {
        if roi.is_degenerate() {
            trace!("ROI {} is degenerate and pools to zero: {:?}", index, roi);
        }
    }
}

/// Pools every bin and channel of one ROI into `roi_output` (`[numTotBins, depth]`).
fn pool_roi<T: SppFloat>(
    mut roi_output: ArrayViewMut2<T>,
    image: ArrayView3<T>,
    roi_bins: &[BinRectangle],
    method: PoolingMethod,
) {
    for (bin, rect) in roi_bins.iter().enumerate() {
        for (channel, slot) in roi_output.row_mut(bin).iter_mut().enumerate() {
            let plane = image.index_axis(Axis(0), channel);
            *slot = match method {
                PoolingMethod::Max => max_pooling::forward_bin(plane, rect),
                PoolingMethod::Average => average_pooling::forward_bin(plane, rect),
            };
        }
    }
}

/// Replays every bin of the ROIs in `roi_indices` onto one (image, channel) gradient plane.
///
/// The plane is owned by the caller, so accumulation needs no synchronisation and always
/// happens in ascending ROI order.
fn accumulate_plane<T: SppFloat>(
    mut grad_plane: ArrayViewMut2<T>,
    plane: ArrayView2<T>,
    channel: usize,
    roi_indices: &[usize],
    bins: &[Vec<BinRectangle>],
    output_grad: ArrayView3<T>,
    method: PoolingMethod,
) {
    for &r in roi_indices {
        for (bin, rect) in bins[r].iter().enumerate() {
            let grad = output_grad[[r, bin, channel]];
            match method {
                PoolingMethod::Max => {
                    max_pooling::backward_bin(grad_plane.view_mut(), plane, rect, grad)
                }
                PoolingMethod::Average => {
                    average_pooling::backward_bin(grad_plane.view_mut(), rect, grad)
                }
            }
        }
    }
}

/// Spatial pyramid pooling forward pass.
///
/// Every ROI is divided by every pyramid level and each bin is reduced per channel.
/// `output` is fully overwritten.
///
/// # Parameters
///
/// - `output` - Pooled output `[numROIs, numTotBins, depth]`
/// - `data` - Feature map `[size, depth, height, width]`
/// - `num_tot_bins` - Total bin count as computed by the caller
/// - `levels` - Pyramid levels shared by all ROIs
/// - `rois` - ROI tensor `(>=5, numROIs)`, one `{image, x1, y1, x2, y2}` column per ROI
/// - `method` - Max or average pooling
/// - `options` - ROI convention and execution target
///
/// # Errors
///
/// - `SppError::InvalidArgument` - If `num_tot_bins` disagrees with `levels`, a tensor has
///   the wrong shape or the ROI tensor is malformed
/// - `SppError::UnsupportedConfiguration` - If the execution target is not available
///
/// Nothing is written when an error is returned.
pub fn forward<T: SppFloat>(
    mut output: ArrayViewMut3<T>,
    data: ArrayView4<T>,
    num_tot_bins: usize,
    levels: &PyramidLevels,
    rois: ArrayView2<T>,
    method: PoolingMethod,
    options: &SppOptions,
) -> Result<(), SppError> {
    validate_all_dims_positive(data.shape())?;
    validate_total_bins(num_tot_bins, levels)?;

    let (size, depth, height, width) = data.dim();
    let rois = parse_rois(rois, options.convention(), size)?;
    validate_pooled_shape(output.shape(), rois.len(), num_tot_bins, depth, "pooled output")?;
    let parallel = options.use_parallel::<T>(rois.len() * depth)?;

    debug!(
        "SPP forward: map [{}, {}, {}, {}], {} ROI(s), {} level(s), {} bins, method {}, parallel {}",
        size,
        depth,
        height,
        width,
        rois.len(),
        levels.len(),
        num_tot_bins,
        method,
        parallel
    );
    log_degenerate_rois(&rois);

    let bins = resolve_all(&rois, levels, height, width);

    if parallel {
        output
            .outer_iter_mut()
            .into_par_iter()
            .zip(rois.par_iter().zip(bins.par_iter()))
            .for_each(|(roi_output, (roi, roi_bins))| {
                pool_roi(roi_output, data.index_axis(Axis(0), roi.image), roi_bins, method)
            });
    } else {
        for (roi_output, (roi, roi_bins)) in output.outer_iter_mut().zip(rois.iter().zip(&bins)) {
            pool_roi(roi_output, data.index_axis(Axis(0), roi.image), roi_bins, method);
        }
    }

    Ok(())
}

/// Spatial pyramid pooling backward pass.
///
/// The gradient of every pooled value is added into `input_grad`: at the recomputed
/// argmax for max pooling, spread evenly over the bin for average pooling. `input_grad`
/// is only ever added to, so the caller zeroes it first.
///
/// The gradient is partitioned into disjoint (image, channel) planes, each accumulated by a
/// single work item in ascending ROI order. Sequential and parallel targets therefore
/// produce bit-identical results.
///
/// # Parameters
///
/// - `input_grad` - Gradient w.r.t. the feature map, same shape as `data`
/// - `data` - Feature map `[size, depth, height, width]` of the forward pass
/// - `output_grad` - Gradient w.r.t. the pooled output `[numROIs, numTotBins, depth]`
/// - `num_tot_bins`, `levels`, `rois`, `method`, `options` - As passed to [`forward`]
///
/// # Errors
///
/// - `SppError::InvalidArgument` - If shapes disagree or the ROI tensor is malformed
/// - `SppError::UnsupportedConfiguration` - If the execution target is not available
///
/// Nothing is written when an error is returned.
#[allow(clippy::too_many_arguments)]
pub fn backward<T: SppFloat>(
    mut input_grad: ArrayViewMut4<T>,
    data: ArrayView4<T>,
    output_grad: ArrayView3<T>,
    num_tot_bins: usize,
    levels: &PyramidLevels,
    rois: ArrayView2<T>,
    method: PoolingMethod,
    options: &SppOptions,
) -> Result<(), SppError> {
    validate_all_dims_positive(data.shape())?;
    validate_same_shape(input_grad.shape(), data.shape())?;
    validate_total_bins(num_tot_bins, levels)?;

    let (size, depth, height, width) = data.dim();
    let rois = parse_rois(rois, options.convention(), size)?;
    validate_pooled_shape(
        output_grad.shape(),
        rois.len(),
        num_tot_bins,
        depth,
        "pooled output gradient",
    )?;
    let parallel = options.use_parallel::<T>(size * depth)?;

    debug!(
        "SPP backward: map [{}, {}, {}, {}], {} ROI(s), {} level(s), {} bins, method {}, parallel {}",
        size,
        depth,
        height,
        width,
        rois.len(),
        levels.len(),
        num_tot_bins,
        method,
        parallel
    );
    log_degenerate_rois(&rois);

    let bins = resolve_all(&rois, levels, height, width);
    let mut rois_by_image = vec![Vec::new(); size];
    for (index, roi) in rois.iter().enumerate() {
        rois_by_image[roi.image].push(index);
    }
    trace!(
        "SPP backward: ROI count per image {:?}",
        rois_by_image.iter().map(Vec::len).collect::<Vec<_>>()
    );

    if parallel {
        input_grad
            .outer_iter_mut()
            .into_par_iter()
            .zip(data.outer_iter().into_par_iter())
            .zip(rois_by_image.par_iter())
            .for_each(|((mut image_grad, image), roi_indices)| {
                image_grad
                    .outer_iter_mut()
                    .into_par_iter()
                    .zip(image.outer_iter().into_par_iter())
                    .enumerate()
                    .for_each(|(channel, (grad_plane, plane))| {
                        accumulate_plane(
                            grad_plane,
                            plane,
                            channel,
                            roi_indices,
                            &bins,
                            output_grad,
                            method,
                        )
                    });
            });
    } else {
        for ((mut image_grad, image), roi_indices) in input_grad
            .outer_iter_mut()
            .zip(data.outer_iter())
            .zip(&rois_by_image)
        {
            for (channel, (grad_plane, plane)) in image_grad
                .outer_iter_mut()
                .zip(image.outer_iter())
                .enumerate()
            {
                accumulate_plane(
                    grad_plane,
                    plane,
                    channel,
                    roi_indices,
                    &bins,
                    output_grad,
                    method,
                );
            }
        }
    }

    Ok(())
}

/// Allocating forward pass: returns a fresh `[numROIs, numTotBins, depth]` tensor.
pub fn pooled<T: SppFloat>(
    data: ArrayView4<T>,
    levels: &PyramidLevels,
    rois: ArrayView2<T>,
    method: PoolingMethod,
    options: &SppOptions,
) -> Result<Array3<T>, SppError> {
    let mut output = Array3::zeros((rois.ncols(), levels.total_bins(), data.dim().1));
    forward(
        output.view_mut(),
        data,
        levels.total_bins(),
        levels,
        rois,
        method,
        options,
    )?;
    Ok(output)
}

/// Allocating backward pass: returns a fresh, zero-initialised gradient w.r.t. `data`.
pub fn pooled_backward<T: SppFloat>(
    data: ArrayView4<T>,
    output_grad: ArrayView3<T>,
    levels: &PyramidLevels,
    rois: ArrayView2<T>,
    method: PoolingMethod,
    options: &SppOptions,
) -> Result<Array4<T>, SppError> {
    let mut input_grad = Array4::zeros(data.raw_dim());
    backward(
        input_grad.view_mut(),
        data,
        output_grad,
        levels.total_bins(),
        levels,
        rois,
        method,
        options,
    )?;
    Ok(input_grad)
}
