use super::*;

/// Pixel count of `bin` as a divisor. An empty bin divides by one.
fn divisor<T: SppFloat>(bin: &BinRectangle) -> T {
    T::from_usize(bin.area().max(1)).unwrap_or_else(T::one)
}

/// Average-pools one channel slice over one bin.
///
/// Values are summed in row-major order. An empty bin pools to zero.
pub fn forward_bin<T: SppFloat>(plane: ArrayView2<T>, bin: &BinRectangle) -> T {
    let sum = bin
        .pixels()
        .fold(T::zero(), |acc, pos| acc + plane[pos]);
    sum / divisor(bin)
}

/// Spreads `grad` evenly over every pixel of `bin`, adding `grad / area` to each.
///
/// An empty bin contributes nothing.
pub fn backward_bin<T: SppFloat>(mut grad_plane: ArrayViewMut2<T>, bin: &BinRectangle, grad: T) {
    if bin.is_empty() {
        return;
    }

    let share = grad / divisor(bin);
    grad_plane
        .slice_mut(s![bin.rows(), bin.cols()])
        .mapv_inplace(|g| g + share);
}
