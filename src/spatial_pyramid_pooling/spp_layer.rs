use super::*;
use ndarray::{Array2, ArrayViewD};

/// Spatial pyramid pooling layer.
///
/// Pools every ROI of a feature map into a fixed-length vector per channel, whatever the
/// ROI size: one value per bin of every pyramid level. Input tensor shape:
/// `[batch_size, channels, height, width]`, ROI tensor shape `(5, num_rois)`. Output tensor
/// shape: `[num_rois, total_bins, channels]`.
///
/// # Fields
///
/// - `levels` - Pyramid levels every ROI is divided into
/// - `method` - Max or average pooling
/// - `options` - ROI convention and execution target
/// - `input_cache` - Cached input tensor from the forward pass
/// - `roi_cache` - Cached ROI tensor from the forward pass
///
/// Only the inputs are cached; the max locations are recomputed in backward.
///
/// # Examples
/// ```rust
/// use rustyspp::prelude::*;
/// use ndarray::{Array4, array};
///
/// // One 4x4 single-channel image holding 1..16 row by row
/// let input = Array4::from_shape_fn((1, 1, 4, 4), |(_, _, i, j)| (i * 4 + j + 1) as f32);
/// // One ROI over the whole image: [image, x1, y1, x2, y2]
/// let rois = array![[0.0f32], [0.0], [0.0], [4.0], [4.0]];
///
/// let mut layer = SpatialPyramidPooling::new(
///     PyramidLevels::from_square_sizes(&[2]).unwrap(),
///     PoolingMethod::Max,
///     SppOptions::default(),
/// );
///
/// let output = layer.forward(input.view(), rois.view()).unwrap();
/// assert_eq!(output.shape(), &[1, 4, 1]);
/// assert_eq!(output.iter().copied().collect::<Vec<_>>(), vec![6.0, 8.0, 14.0, 16.0]);
///
/// let grad = layer.backward(ndarray::Array3::ones((1, 4, 1)).view()).unwrap();
/// assert_eq!(grad.sum(), 4.0);
/// ```
pub struct SpatialPyramidPooling<T: SppFloat> {
    levels: PyramidLevels,
    method: PoolingMethod,
    options: SppOptions,
    input_cache: Option<Array4<T>>,
    roi_cache: Option<Array2<T>>,
}

impl<T: SppFloat> SpatialPyramidPooling<T> {
    /// Creates a new spatial pyramid pooling layer.
    ///
    /// # Parameters
    ///
    /// - `levels` - Pyramid levels every ROI is divided into
    /// - `method` - Max or average pooling
    /// - `options` - ROI convention and execution target
    pub fn new(levels: PyramidLevels, method: PoolingMethod, options: SppOptions) -> Self {
        SpatialPyramidPooling {
            levels,
            method,
            options,
            input_cache: None,
            roi_cache: None,
        }
    }

    /// Creates a layer from a host method code and a level tensor.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If the method code or the level tensor is invalid
    pub fn from_host(
        method_code: usize,
        levels: ArrayView2<T>,
        options: SppOptions,
    ) -> Result<Self, SppError> {
        let method = PoolingMethod::try_from(method_code)?;
        let levels = PyramidLevels::from_tensor(levels)?;
        Ok(Self::new(levels, method, options))
    }

    pub fn get_levels(&self) -> &PyramidLevels {
        &self.levels
    }

    pub fn get_method(&self) -> PoolingMethod {
        self.method
    }

    pub fn get_options(&self) -> &SppOptions {
        &self.options
    }

    /// Runs the forward pass and caches `input` and `rois` for [`Self::backward`].
    ///
    /// # Returns
    ///
    /// * `Result<Array3<T>, SppError>` - Pooled tensor `[num_rois, total_bins, channels]`
    pub fn forward(
        &mut self,
        input: ArrayView4<T>,
        rois: ArrayView2<T>,
    ) -> Result<Array3<T>, SppError> {
        let output = pooled(input, &self.levels, rois, self.method, &self.options)?;

        self.input_cache = Some(input.to_owned());
        self.roi_cache = Some(rois.to_owned());

        Ok(output)
    }

    /// Forward pass over a dynamic-dimensional input, as produced by `into_dyn()`.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If `input` is not 4D
    pub fn forward_dyn(
        &mut self,
        input: ArrayViewD<T>,
        rois: ArrayView2<T>,
    ) -> Result<Array3<T>, SppError> {
        let input = input.into_dimensionality::<ndarray::Ix4>().map_err(|_| {
            SppError::InvalidArgument("input tensor is not 4D".to_string())
        })?;
        self.forward(input, rois)
    }

    /// Propagates `grad_output` back to the input of the last forward pass.
    ///
    /// # Returns
    ///
    /// * `Result<Array4<T>, SppError>` - Gradient w.r.t. the input, same shape as the input
    ///
    /// # Errors
    ///
    /// - `SppError::ProcessingError` - If forward has not been run
    /// - `SppError::InvalidArgument` - If `grad_output` does not match the last output shape
    pub fn backward(&self, grad_output: ArrayView3<T>) -> Result<Array4<T>, SppError> {
        if let (Some(input), Some(rois)) = (&self.input_cache, &self.roi_cache) {
            pooled_backward(
                input.view(),
                grad_output,
                &self.levels,
                rois.view(),
                self.method,
                &self.options,
            )
        } else {
            Err(SppError::ProcessingError(
                "Forward pass has not been run".to_string(),
            ))
        }
    }

    pub fn layer_type(&self) -> &str {
        "SpatialPyramidPooling"
    }

    /// Output shape `(num_rois, total_bins, channels)` of the last forward pass.
    pub fn output_shape(&self) -> String {
        match (&self.input_cache, &self.roi_cache) {
            (Some(input), Some(rois)) => format!(
                "({}, {}, {})",
                rois.ncols(),
                self.levels.total_bins(),
                input.dim().1
            ),
            _ => String::from("Unknown"),
        }
    }

    /// Pooling has no trainable parameters.
    pub fn param_count(&self) -> usize {
        0
    }
}
