use ndarray::Array1;

/// Centred spatial coordinates for an axis of `n` samples at `pitch` spacing.
///
/// Sample `i` sits at `(i - n/2) * pitch` with `n/2` rounded down, so index
/// `n / 2` is exactly at the origin and even axes span one more sample on the
/// negative side.
pub fn coordinate_axis(n: usize, pitch: f64) -> Array1<f64> {
    let half = (n / 2) as f64;
    Array1::from_shape_fn(n, |i| (i as f64 - half) * pitch)
}

/// Spatial frequencies for an axis of `n` samples at `pitch` spacing, in the
/// standard FFT ordering: non-negative frequencies first, then the negative
/// block. Matches the layout `fft2` produces, so spectra can be multiplied
/// without any shift.
pub fn frequency_axis(n: usize, pitch: f64) -> Array1<f64> {
    let step = 1.0 / (n as f64 * pitch);
    Array1::from_shape_fn(n, |i| {
        let k = if i < (n + 1) / 2 {
            i as isize
        } else {
            i as isize - n as isize
        };
        k as f64 * step
    })
}
