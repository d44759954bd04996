use super::*;

/// Default work-item count from which `ExecutionTarget::Auto` switches to the rayon pool.
pub const SPP_PARALLEL_THRESHOLD: usize = 32;

/// Where the (ROI, level, bin, channel) tuples are evaluated.
///
/// # Variants
///
/// - `Sequential` - plain loops on the calling thread
/// - `Parallel` - rayon's global thread pool
/// - `Auto` - parallel once the number of independent work items reaches the threshold
/// - `Gpu` - device execution; no device backend is built into this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionTarget {
    Sequential,
    Parallel,
    #[default]
    Auto,
    Gpu,
}

/// Call-time configuration shared by forward and backward.
///
/// # Fields
///
/// - `convention` - Coordinate convention of the ROI tensor
/// - `target` - Execution target
/// - `parallel_threshold` - Work-item count from which `Auto` goes parallel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SppOptions {
    convention: RoiConvention,
    target: ExecutionTarget,
    parallel_threshold: usize,
}

impl Default for SppOptions {
    fn default() -> Self {
        SppOptions {
            convention: RoiConvention::ZeroBased,
            target: ExecutionTarget::Auto,
            parallel_threshold: SPP_PARALLEL_THRESHOLD,
        }
    }
}

impl SppOptions {
    pub fn new(convention: RoiConvention, target: ExecutionTarget) -> Self {
        SppOptions {
            convention,
            target,
            ..Self::default()
        }
    }

    /// Sets the work-item count from which `ExecutionTarget::Auto` runs in parallel.
    ///
    /// # Errors
    ///
    /// - `SppError::InvalidArgument` - If `threshold` is zero
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Result<Self, SppError> {
        if threshold == 0 {
            return Err(SppError::InvalidArgument(
                "parallel_threshold must be greater than zero".to_string(),
            ));
        }
        self.parallel_threshold = threshold;
        Ok(self)
    }

    pub fn with_convention(mut self, convention: RoiConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_target(mut self, target: ExecutionTarget) -> Self {
        self.target = target;
        self
    }

    pub fn convention(&self) -> RoiConvention {
        self.convention
    }

    pub fn target(&self) -> ExecutionTarget {
        self.target
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Decides whether `work_items` independent items of element type `T` run on the
    /// rayon pool.
    ///
    /// # Errors
    ///
    /// - `SppError::UnsupportedConfiguration` - If the target is `ExecutionTarget::Gpu`
    pub fn use_parallel<T: SppFloat>(&self, work_items: usize) -> Result<bool, SppError> {
        match self.target {
            ExecutionTarget::Sequential => Ok(false),
            ExecutionTarget::Parallel => Ok(true),
            ExecutionTarget::Auto => Ok(work_items >= self.parallel_threshold),
            ExecutionTarget::Gpu => Err(SppError::UnsupportedConfiguration(format!(
                "GPU execution is not available for element type {}",
                std::any::type_name::<T>()
            ))),
        }
    }
}
