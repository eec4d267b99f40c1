use ndarray::parallel::prelude::{IntoParallelIterator, ParallelIterator};
use ndarray::{s, Array2, ArrayView2, ArrayViewMut2, Zip};
use num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{FftDirection, FftPlanner};

/// Forward 2D FFT with `1/sqrt(N)` normalisation.
///
/// Both directions carry the same normalisation, so the transform pair is
/// unitary: `ifft2(fft2(x)) == x` and the total squared norm is preserved
/// (Parseval). The propagation operators rely on both properties.
pub fn fft2(mut input: Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    fft2_inplace(input.view_mut(), FftDirection::Forward);
    input
}

/// Inverse 2D FFT with `1/sqrt(N)` normalisation.
pub fn ifft2(mut input: Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    fft2_inplace(input.view_mut(), FftDirection::Inverse);
    input
}

fn fft2_inplace(mut input: ArrayViewMut2<Complex<f64>>, direction: FftDirection) {
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft(input.shape()[1], direction);
    let fft_col = planner.plan_fft(input.shape()[0], direction);
    let normalisation = 1.0 / ((input.shape()[0] * input.shape()[1]) as f64).sqrt();

    Zip::from(input.rows_mut()).into_par_iter().for_each_init(
        || vec![Zero::zero(); fft_row.get_inplace_scratch_len()],
        |scratch, mut row| {
            fft_row.process_with_scratch(row.0.as_slice_mut().unwrap(), scratch);
        },
    );

    // columns are strided, so gather each lane into a contiguous buffer
    Zip::from(input.columns_mut())
        .into_par_iter()
        .for_each_init(
            || {
                (
                    vec![Zero::zero(); fft_col.len()],
                    vec![Zero::zero(); fft_col.get_inplace_scratch_len()],
                )
            },
            |(temp, scratch), mut col| {
                for (t, &c) in temp.iter_mut().zip(col.0.iter()) {
                    *t = c;
                }
                fft_col.process_with_scratch(temp, scratch);
                for (c, &t) in col.0.iter_mut().zip(temp.iter()) {
                    *c = t * normalisation;
                }
            },
        );
}

/// Embeds `input` centred in a zero array of shape `out_shape`.
///
/// The zero margin before each axis is `(out - in) / 2` rounded down, the
/// remainder goes after. `crop_to` with the original shape inverts this
/// exactly.
pub fn pad_to(input: ArrayView2<Complex<f64>>, out_shape: [usize; 2]) -> Array2<Complex<f64>> {
    let (m0, m1) = input.dim();
    assert!(
        out_shape[0] >= m0 && out_shape[1] >= m1,
        "pad target {:?} smaller than input {:?}",
        out_shape,
        (m0, m1)
    );
    let o0 = (out_shape[0] - m0) / 2;
    let o1 = (out_shape[1] - m1) / 2;
    let mut out = Array2::zeros(out_shape);
    out.slice_mut(s![o0..o0 + m0, o1..o1 + m1]).assign(&input);
    out
}

/// Extracts the centred window of shape `out_shape`, inverting `pad_to`.
pub fn crop_to(input: ArrayView2<Complex<f64>>, out_shape: [usize; 2]) -> Array2<Complex<f64>> {
    let (m0, m1) = input.dim();
    assert!(
        out_shape[0] <= m0 && out_shape[1] <= m1,
        "crop target {:?} larger than input {:?}",
        out_shape,
        (m0, m1)
    );
    let o0 = (m0 - out_shape[0]) / 2;
    let o1 = (m1 - out_shape[1]) / 2;
    input
        .slice(s![o0..o0 + out_shape[0], o1..o1 + out_shape[1]])
        .to_owned()
}
