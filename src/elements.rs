use crate::grid::coordinate_axis;
use crate::jones::JonesMatrix;
use crate::JonesField;
use ndarray::{Array2, ArrayView2, Zip};
use num_complex::Complex;
use std::f64::consts::PI;

/// Which Jones component an element addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarization {
    Horizontal,
    Vertical,
}

/// Multiplies one component by a complex transmission mask, sample by sample.
/// The other component is left untouched, which is how a polarization-selective
/// SLM behaves.
///
/// Panics if the mask shape differs from the component shape.
pub fn apply_phase_mask(
    mut field: JonesField,
    mask: ArrayView2<Complex<f64>>,
    component: Polarization,
) -> JonesField {
    assert_eq!(
        field.h.dim(),
        field.v.dim(),
        "component shapes differ"
    );
    assert_eq!(
        mask.dim(),
        field.h.dim(),
        "mask shape differs from component shape"
    );
    let target = match component {
        Polarization::Horizontal => &mut field.h,
        Polarization::Vertical => &mut field.v,
    };
    Zip::from(target).and(&mask).par_for_each(|e, &m| *e *= m);
    field
}

/// Thin lens of the given focal length: multiplies both components by the
/// quadratic phase `exp(-i * k / (2 f) * (x^2 + y^2))` with `k = 2 pi /
/// wavelength`, on the centred coordinate grid.
///
/// A negative focal length gives the diverging lens.
pub fn apply_lens(mut field: JonesField, focal_length: f64, wavelength: f64) -> JonesField {
    assert_eq!(
        field.h.dim(),
        field.v.dim(),
        "component shapes differ"
    );
    assert!(focal_length != 0.0, "focal length must be non-zero");
    assert!(wavelength > 0.0, "wavelength must be positive");
    let k = 2.0 * PI / wavelength;
    let (ny, nx) = field.h.dim();
    let ys = coordinate_axis(ny, field.pitch);
    let xs = coordinate_axis(nx, field.pitch);
    Zip::indexed(&mut field.h)
        .and(&mut field.v)
        .par_for_each(|(y, x), h, v| {
            let x0 = xs[x];
            let y0 = ys[y];
            let factor =
                Complex::new(0.0, -k / (2.0 * focal_length) * (x0 * x0 + y0 * y0)).exp();
            *h *= factor;
            *v *= factor;
        });
    field
}

/// Half-wave plate at `angle_deg`: applies the plate's Jones matrix to every
/// (h, v) sample, mixing the components.
pub fn apply_waveplate(mut field: JonesField, angle_deg: f64) -> JonesField {
    assert_eq!(
        field.h.dim(),
        field.v.dim(),
        "component shapes differ"
    );
    let m = JonesMatrix::half_wave_plate(angle_deg);
    Zip::from(&mut field.h)
        .and(&mut field.v)
        .par_for_each(|h, v| {
            let (nh, nv) = m.apply(*h, *v);
            *h = nh;
            *v = nv;
        });
    field
}

/// Ideal polarizing beam splitter: the transmitted arm keeps the horizontal
/// component, the reflected arm the vertical one. The kept buffers move, the
/// evacuated components are fresh zeros, so no energy is lost or duplicated.
pub fn apply_pbs(field: JonesField) -> (JonesField, JonesField) {
    assert_eq!(
        field.h.dim(),
        field.v.dim(),
        "component shapes differ"
    );
    let dim = field.h.dim();
    let pitch = field.pitch;
    let transmitted = JonesField {
        h: field.h,
        v: Array2::zeros(dim),
        pitch,
    };
    let reflected = JonesField {
        h: Array2::zeros(dim),
        v: field.v,
        pitch,
    };
    (transmitted, reflected)
}
