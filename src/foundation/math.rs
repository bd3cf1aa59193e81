/// Round `value` up to the next multiple of `alignment`.
///
/// An `alignment` of zero leaves the value untouched. Saturates instead of wrapping.
pub fn align_ceil(value: u32, alignment: u32) -> u32 {
    if alignment == 0 {
        return value;
    }
    value.div_ceil(alignment).saturating_mul(alignment)
}

/// Ratio `num / den` as `f32`, `1.0` when the denominator is zero.
pub(crate) fn ratio_f32(num: u32, den: u32) -> f32 {
    if den == 0 {
        return 1.0;
    }
    num as f32 / den as f32
}
