//! Border extrapolation for windowed filters.

/// Mirror an out-of-range index without repeating the edge sample
/// (`dcb|abcd|cba`). Folds repeatedly for windows wider than the image.
#[inline]
pub(crate) fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let n = len as isize;
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}
