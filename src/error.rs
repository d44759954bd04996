use thiserror::Error;

/// Error types that can occur while running spatial pyramid pooling
///
/// # Variants
///
/// - `InvalidArgument` - the tensors, levels, ROIs or method selector handed to the operator are inconsistent or malformed
/// - `UnsupportedConfiguration` - the requested execution target is not available for this build
/// - `ProcessingError` - a stateful layer was used out of order, e.g. backward before forward
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error("Processing error: {0}")]
    ProcessingError(String),
}
