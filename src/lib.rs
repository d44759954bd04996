/// Error type shared by every operation of the crate.
///
/// - `SppError::InvalidArgument` - inconsistent shapes, a `numTotBins` that disagrees with the
///   pyramid, malformed ROIs or an unknown pooling method
/// - `SppError::UnsupportedConfiguration` - an execution target that is not built in
/// - `SppError::ProcessingError` - a stateful layer used out of order
pub mod error;

/// Spatial pyramid pooling (SPP) over regions of interest.
///
/// Every ROI of a feature map is divided into the grid of each pyramid level, and every
/// resulting bin is reduced per channel to a single value by max or average pooling. This
/// gives a fixed-length descriptor per ROI whatever its size.
///
/// # Core Components
///
/// ## Bin Geometry
/// - `resolve` - Half-open, clipped pixel rectangle of one bin of one ROI at one level
/// - `PyramidLevels` - Ordered grid resolutions and the resulting `numTotBins`
/// - `Roi` / `RoiConvention` - Region records in zero- or one-based coordinates
///
/// ## Reduction Engines
/// - `max_pooling` - First-occurrence argmax in row-major scan order; backward adds the
///   gradient at the recomputed argmax
/// - `average_pooling` - Mean over the bin; backward spreads the gradient evenly
///
/// ## Entry Points
/// - `forward` / `backward` - Write into caller-owned buffers, validate first, never panic
/// - `pooled` / `pooled_backward` - Allocating variants
/// - `SpatialPyramidPooling` - Stateful layer caching its inputs between passes
///
/// # Key Features
/// - **Generic element type**: `f32` and `f64` through `num_traits::Float`
/// - **Parallel Processing**: rayon over ROIs in forward and over disjoint
///   (image, channel) gradient planes in backward, bit-identical to the sequential path
/// - **Host layouts**: zero-copy views over column-major `(height, width, depth, size)`
///   buffers
///
/// # Examples
/// ```rust
/// use rustyspp::prelude::*;
/// use ndarray::{Array3, Array4, array};
///
/// let data = Array4::from_shape_fn((1, 1, 4, 4), |(_, _, i, j)| (i * 4 + j + 1) as f64);
/// let rois = array![[0.0], [0.0], [0.0], [4.0], [4.0]];
/// let levels = PyramidLevels::from_square_sizes(&[2]).unwrap();
///
/// let mut output = Array3::zeros((1, levels.total_bins(), 1));
/// forward(
///     output.view_mut(),
///     data.view(),
///     levels.total_bins(),
///     &levels,
///     rois.view(),
///     PoolingMethod::Average,
///     &SppOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(output.iter().copied().collect::<Vec<_>>(), vec![3.5, 5.5, 11.5, 13.5]);
/// ```
pub mod spatial_pyramid_pooling;

/// A convenience module that re-exports the most commonly used types and functions.
///
/// # Examples
/// ```rust
/// use rustyspp::prelude::*;
/// ```
pub mod prelude;

pub use error::SppError;
