pub use crate::error::SppError;
pub use crate::spatial_pyramid_pooling::memory_layout::{
    MapDims, feature_map_view, feature_map_view_mut, pooled_view, pooled_view_mut,
};
pub use crate::spatial_pyramid_pooling::{
    BinRectangle, ExecutionTarget, PoolingMethod, PyramidLevel, PyramidLevels, Roi,
    RoiConvention, SpatialPyramidPooling, SppFloat, SppOptions, backward, forward, pooled,
    pooled_backward, resolve,
};
