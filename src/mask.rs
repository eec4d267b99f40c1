use ndarray::{s, Array2, ArrayView2, Zip};
use num_complex::Complex;
use rand::Rng;
use std::f64::consts::PI;

/// Binary {0, pi} phase mask randomised per block.
///
/// The mask is tiled into `block_size` x `block_size` squares and every block
/// draws its phase once, 0 or pi with equal probability, so all samples inside
/// a block agree. Trailing rows and columns that do not fill a whole block are
/// dropped: the result has shape `(height / block_size * block_size,
/// width / block_size * block_size)`.
///
/// Blocks are drawn row-major from `rng`, so a seeded generator reproduces the
/// same mask.
pub fn generate_block_mask<R: Rng>(
    height: usize,
    width: usize,
    block_size: usize,
    rng: &mut R,
) -> Array2<f64> {
    assert!(block_size > 0, "block size must be at least 1");
    let blocks_y = height / block_size;
    let blocks_x = width / block_size;
    let mut mask = Array2::zeros([blocks_y * block_size, blocks_x * block_size]);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let phase = if rng.gen_bool(0.5) { PI } else { 0.0 };
            mask.slice_mut(s![
                by * block_size..(by + 1) * block_size,
                bx * block_size..(bx + 1) * block_size
            ])
            .fill(phase);
        }
    }
    tracing::debug!(blocks_y, blocks_x, block_size, "generated block mask");
    mask
}

/// Lifts a phase mask to complex transmission values `exp(i * phase)` centred
/// on a `grid_size` x `grid_size` grid.
///
/// The margin before each axis is `(grid_size - mask_dim) / 2` rounded down.
/// Outside the mask the grid is zero, so uncovered samples block the beam
/// rather than passing it.
///
/// Panics if the mask does not fit strictly inside the grid.
pub fn embed_mask_in_grid(mask: ArrayView2<f64>, grid_size: usize) -> Array2<Complex<f64>> {
    let (mh, mw) = mask.dim();
    assert!(
        mh < grid_size && mw < grid_size,
        "mask size {}x{} exceeds grid size {}",
        mh,
        mw,
        grid_size
    );
    let oy = (grid_size - mh) / 2;
    let ox = (grid_size - mw) / 2;
    let mut out = Array2::zeros([grid_size, grid_size]);
    let window = out.slice_mut(s![oy..oy + mh, ox..ox + mw]);
    Zip::from(window).and(&mask).for_each(|e, &phase| {
        *e = Complex::new(0.0, phase).exp();
    });
    out
}
