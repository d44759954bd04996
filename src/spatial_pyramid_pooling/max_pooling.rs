use super::*;

/// Finds the first maximum of `plane` inside `bin`.
///
/// Pixels are scanned row-major and only a strictly larger value replaces the current
/// maximum, so ties go to the first pixel met.
///
/// # Returns
///
/// * `Option<(usize, usize)>` - `(row, col)` of the maximum, `None` for an empty bin
pub fn argmax<T: SppFloat>(plane: ArrayView2<T>, bin: &BinRectangle) -> Option<(usize, usize)> {
    let mut pixels = bin.pixels();
    let first = pixels.next()?;

    let mut max_pos = first;
    let mut max_val = plane[first];
    for pos in pixels {
        let val = plane[pos];
        if val > max_val {
            max_val = val;
            max_pos = pos;
        }
    }

    Some(max_pos)
}

/// Max-pools one channel slice over one bin. An empty bin pools to zero.
pub fn forward_bin<T: SppFloat>(plane: ArrayView2<T>, bin: &BinRectangle) -> T {
    argmax(plane, bin)
        .map(|pos| plane[pos])
        .unwrap_or_else(T::zero)
}

/// Routes `grad` to the argmax of `bin`, recomputed from the forward input `plane`.
///
/// The gradient is added, never assigned, since several bins may share an argmax.
/// An empty bin has no argmax and contributes nothing.
pub fn backward_bin<T: SppFloat>(
    mut grad_plane: ArrayViewMut2<T>,
    plane: ArrayView2<T>,
    bin: &BinRectangle,
    grad: T,
) {
    if let Some(pos) = argmax(plane, bin) {
        grad_plane[pos] = grad_plane[pos] + grad;
    }
}
