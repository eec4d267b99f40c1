//! Angular-spectrum simulation of a polarized optical bench.
//!
//! A beam is represented as two complex component grids (horizontal and
//! vertical). Free-space propagation uses the angular spectrum method on a
//! zero-padded grid; optical elements (SLM phase masks, a thin lens, a
//! half-wave plate, a polarizing beam splitter) act on the components through
//! Jones calculus; the detector model reduces the field to a quantized
//! intensity image.

use crate::fft2::{crop_to, fft2, ifft2, pad_to};
use ndarray::{Array2, Zip};
use num_complex::Complex;
use std::f64::consts::PI;

pub mod beam;
pub mod config;
pub mod detector;
pub mod elements;
mod fft2;
pub mod grid;
pub mod jones;
pub mod mask;

/// A complex scalar field sampled at a given pitch.
///
/// The squared norm of a sample is the local irradiance.
#[derive(Clone, Debug)]
pub struct Field {
    pub values: Array2<Complex<f64>>,
    /// Sample spacing, equal on both axes.
    pub pitch: f64,
}

impl Field {
    /// Calculates the area weighted sum of the squared norm of the field.
    ///
    /// This results in a conserved value, Radiant flux.
    pub fn intensity_integral(&self) -> f64 {
        self.values.iter().fold(0.0, |sum, v| sum + v.norm_sqr()) * (self.pitch * self.pitch)
    }
}

/// A polarized field: horizontal and vertical Jones components on one grid.
///
/// The components are separately owned, so an element can modulate one while
/// the other stays bit-identical.
#[derive(Clone, Debug)]
pub struct JonesField {
    pub h: Array2<Complex<f64>>,
    pub v: Array2<Complex<f64>>,
    /// Sample spacing, equal on both axes and shared by both components.
    pub pitch: f64,
}

impl JonesField {
    /// Panics if the component shapes differ.
    pub fn new(h: Array2<Complex<f64>>, v: Array2<Complex<f64>>, pitch: f64) -> JonesField {
        assert_eq!(h.dim(), v.dim(), "component shapes differ");
        JonesField { h, v, pitch }
    }

    /// Grid shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.h.dim()
    }

    /// Radiant flux summed over both polarization components.
    pub fn intensity_integral(&self) -> f64 {
        let sum = self.h.iter().fold(0.0, |sum, v| sum + v.norm_sqr())
            + self.v.iter().fold(0.0, |sum, v| sum + v.norm_sqr());
        sum * (self.pitch * self.pitch)
    }
}

/// Multiplies a spectrum by the free-space transfer function for distance `z`:
/// `exp(i 2 pi z sqrt(1 / lambda^2 - fx^2 - fy^2))`.
///
/// The radicand is clamped at zero, so evanescent frequencies are carried with
/// unit magnitude instead of turning into NaN or blowing up. The axes follow
/// the FFT ordering `fft2` produces, no shift required.
fn apply_propagation_kernel(
    spectrum: &mut Array2<Complex<f64>>,
    pitch: f64,
    z: f64,
    wavelength: f64,
) {
    let (ny, nx) = spectrum.dim();
    let fy = grid::frequency_axis(ny, pitch);
    let fx = grid::frequency_axis(nx, pitch);
    let inv_lambda_sqr = 1.0 / (wavelength * wavelength);
    Zip::indexed(spectrum).par_for_each(|(y, x), e| {
        let fy0 = fy[y];
        let fx0 = fx[x];
        let radicand = (inv_lambda_sqr - fx0 * fx0 - fy0 * fy0).max(0.0);
        *e = *e * Complex::new(0.0, 2.0 * PI * z * radicand.sqrt()).exp()
    });
}

/// Angular spectrum propagation on the native grid, without padding.
///
/// The periodic grid wraps energy that reaches an edge back onto the opposite
/// side. Use [`propagate_scalar`] unless the field's support is known to stay
/// well inside the grid.
pub fn propagate_unpadded(field: Field, z: f64, wavelength: f64) -> Field {
    assert!(wavelength > 0.0, "wavelength must be positive");
    let pitch = field.pitch;
    let mut spectrum = fft2(field.values);
    apply_propagation_kernel(&mut spectrum, pitch, z, wavelength);
    Field {
        values: ifft2(spectrum),
        pitch,
    }
}

/// Angular spectrum propagation with zero padding.
///
/// The field is embedded centred in a grid enlarged `pad_factor` times per
/// axis, propagated there, and cropped back to its original extent, which
/// suppresses wraparound from the periodic transform. Energy that diffracts
/// beyond the original extent is lost at the crop; over the whole padded grid
/// the method is energy conserving since the transfer function has unit
/// magnitude.
pub fn propagate_scalar(field: Field, z: f64, wavelength: f64, pad_factor: usize) -> Field {
    assert!(pad_factor >= 1, "pad factor must be at least 1");
    if pad_factor == 1 {
        return propagate_unpadded(field, z, wavelength);
    }
    assert!(wavelength > 0.0, "wavelength must be positive");
    let pitch = field.pitch;
    let (ny, nx) = field.values.dim();
    let padded_shape = [ny * pad_factor, nx * pad_factor];
    tracing::debug!(from = ?(ny, nx), to = ?padded_shape, z, "padded propagation");

    let mut spectrum = fft2(pad_to(field.values.view(), padded_shape));
    apply_propagation_kernel(&mut spectrum, pitch, z, wavelength);
    let values = crop_to(ifft2(spectrum).view(), [ny, nx]);
    Field { values, pitch }
}

/// Propagates both Jones components over the same distance.
///
/// Free space does not couple the polarizations, so each component goes
/// through [`propagate_scalar`] independently.
pub fn propagate_vector(
    field: JonesField,
    z: f64,
    wavelength: f64,
    pad_factor: usize,
) -> JonesField {
    assert_eq!(field.h.dim(), field.v.dim(), "component shapes differ");
    let pitch = field.pitch;
    let h = propagate_scalar(
        Field {
            values: field.h,
            pitch,
        },
        z,
        wavelength,
        pad_factor,
    )
    .values;
    let v = propagate_scalar(
        Field {
            values: field.v,
            pitch,
        },
        z,
        wavelength,
        pad_factor,
    )
    .values;
    JonesField { h, v, pitch }
}
