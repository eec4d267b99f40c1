use crate::grid::coordinate_axis;
use crate::{Field, JonesField};
use ndarray::{Array2, Zip};
use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

/// Collimated Gaussian beam sampled on the centred coordinate grid.
///
/// Amplitude `exp(-(x^2 / waist_x^2 + y^2 / waist_y^2))` with zero phase and
/// unit peak, so the waist sits on the grid centre at index
/// `(size_y / 2, size_x / 2)`.
pub fn gaussian_beam(
    size_x: usize,
    size_y: usize,
    pitch: f64,
    waist_x: f64,
    waist_y: f64,
) -> Field {
    assert!(pitch > 0.0, "pitch must be positive");
    assert!(
        waist_x > 0.0 && waist_y > 0.0,
        "beam waist must be positive"
    );
    let xs = coordinate_axis(size_x, pitch);
    let ys = coordinate_axis(size_y, pitch);
    let mut values = Array2::zeros([size_y, size_x]);
    Zip::indexed(&mut values).par_for_each(|(y, x), e| {
        let x0 = xs[x];
        let y0 = ys[y];
        let amplitude =
            (-(x0 * x0) / (waist_x * waist_x) - (y0 * y0) / (waist_y * waist_y)).exp();
        *e = Complex::new(amplitude, 0.0);
    });
    Field { values, pitch }
}

/// Splits a scalar beam into equal horizontal and vertical components, i.e.
/// linear polarization at 45 degrees.
///
/// Each component is the input scaled by `1/sqrt(2)`, so the summed intensity
/// matches the scalar input. The components are separately owned copies;
/// modulating one later leaves the other bit-identical.
pub fn diagonal_polarization(field: Field) -> JonesField {
    let h = field.values.mapv(|e| e * FRAC_1_SQRT_2);
    let v = h.clone();
    JonesField {
        h,
        v,
        pitch: field.pitch,
    }
}
