use super::*;

/// Number of leading rows of the ROI tensor that are read: `{image, x1, y1, x2, y2}`.
pub const ROI_DESCRIPTOR_ROWS: usize = 5;

/// Coordinate convention of the ROI tensor supplied by the caller.
///
/// # Variants
///
/// - `ZeroBased` - zero-based image index, continuous end-exclusive pixel bounds
/// - `OneBased` - one-based image index, one-based inclusive pixel bounds (the convention
///   of column-major host environments); `x1 = 1, x2 = width` spans the whole row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoiConvention {
    #[default]
    ZeroBased,
    OneBased,
}

/// A region of interest in the zero-based, end-exclusive frame used for bin geometry.
///
/// `x` runs along the width of the feature map, `y` along its height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub image: usize,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Roi {
    /// Creates a ROI from zero-based, end-exclusive coordinates.
    pub fn new(image: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Roi {
            image,
            x1,
            y1,
            x2,
            y2,
        }
    }

    /// A ROI is degenerate when it has no positive extent along either axis.
    /// Degenerate ROIs pool to zero and receive no gradient.
    pub fn is_degenerate(&self) -> bool {
        !(self.x2 > self.x1 && self.y2 > self.y1)
    }
}

/// Reads the ROI tensor of shape `(>=5, numROIs)` into zero-based [`Roi`]s.
///
/// # Parameters
///
/// - `rois` - ROI tensor, one column per ROI holding `{image, x1, y1, x2, y2}`
/// - `convention` - Coordinate convention the columns are written in
/// - `batch_size` - Number of images in the feature map, bounds the image index
///
/// # Errors
///
/// - `SppError::InvalidArgument` - If the tensor has fewer than 5 rows, an image index is
///   not an integer inside `[0, batch_size)` after conversion, or a bound is not finite
pub fn parse_rois<T: SppFloat>(
    rois: ArrayView2<T>,
    convention: RoiConvention,
    batch_size: usize,
) -> Result<Vec<Roi>, SppError> {
    if rois.nrows() < ROI_DESCRIPTOR_ROWS {
        return Err(SppError::InvalidArgument(format!(
            "ROI tensor must have at least {} rows [image, x1, y1, x2, y2], got shape {:?}",
            ROI_DESCRIPTOR_ROWS,
            rois.shape()
        )));
    }

    let shift = match convention {
        RoiConvention::ZeroBased => 0.0,
        RoiConvention::OneBased => 1.0,
    };

    rois.columns()
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            let mut fields = [0.0f64; ROI_DESCRIPTOR_ROWS];
            for (field, value) in fields.iter_mut().zip(column.iter()) {
                *field = value.to_f64().filter(|v| v.is_finite()).ok_or_else(|| {
                    SppError::InvalidArgument(format!(
                        "ROI {} has a non-finite entry {:?}",
                        index, value
                    ))
                })?;
            }
            let [image, x1, y1, x2, y2] = fields;

            let image = image - shift;
            if image.fract() != 0.0 || image < 0.0 || image >= batch_size as f64 {
                return Err(SppError::InvalidArgument(format!(
                    "ROI {} refers to image {} but the feature map holds {} image(s)",
                    index,
                    image + shift,
                    batch_size
                )));
            }

            // inclusive one-based ends already equal the exclusive zero-based ones
            Ok(Roi::new(image as usize, x1 - shift, y1 - shift, x2, y2))
        })
        .collect()
}
