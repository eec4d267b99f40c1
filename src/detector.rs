use crate::JonesField;
use ndarray::{s, Array2, Zip};

/// Detector-plane intensity `|H|^2 + |V|^2`.
///
/// A photodetector is polarization-blind, so the two components add
/// incoherently. Always non-negative.
pub fn intensity(field: &JonesField) -> Array2<f64> {
    assert_eq!(
        field.h.dim(),
        field.v.dim(),
        "component shapes differ"
    );
    let mut out = Array2::zeros(field.h.dim());
    Zip::from(&mut out)
        .and(&field.h)
        .and(&field.v)
        .par_for_each(|o, h, v| *o = h.norm_sqr() + v.norm_sqr());
    out
}

/// Downsamples an intensity image to the detector's pixel size by averaging
/// square bins.
///
/// The bin factor is `floor(detector_pixel_size / sim_pixel_size)`; a factor
/// of one or less returns the input unchanged. Trailing rows and columns that
/// do not fill a whole bin are dropped, matching the block mask policy.
pub fn bin_pixels(
    intensity: Array2<f64>,
    sim_pixel_size: f64,
    detector_pixel_size: f64,
) -> Array2<f64> {
    assert!(
        sim_pixel_size > 0.0 && detector_pixel_size > 0.0,
        "pixel sizes must be positive"
    );
    let bin = (detector_pixel_size / sim_pixel_size).floor() as usize;
    if bin <= 1 {
        return intensity;
    }
    let (h, w) = intensity.dim();
    let out_h = h / bin;
    let out_w = w / bin;
    let norm = 1.0 / (bin * bin) as f64;
    let mut out = Array2::zeros((out_h, out_w));
    for by in 0..out_h {
        for bx in 0..out_w {
            let window = intensity.slice(s![by * bin..(by + 1) * bin, bx * bin..(bx + 1) * bin]);
            out[[by, bx]] = window.sum() * norm;
        }
    }
    tracing::debug!(bin, from = ?(h, w), to = ?(out_h, out_w), "binned detector image");
    out
}

/// Quantizes an intensity image to `bit_depth` bits.
///
/// The image is normalised by its own maximum, scaled to `2^bit_depth - 1`
/// and truncated, so the brightest sample always reads full scale. Supported
/// depths are 1 through 16.
///
/// Panics if the maximum is zero, since a blank image cannot be normalised.
pub fn quantize(image: &Array2<f64>, bit_depth: u32) -> Array2<u16> {
    assert!(
        (1..=16).contains(&bit_depth),
        "bit depth {} outside supported range 1..=16",
        bit_depth
    );
    let max = image.iter().fold(0.0f64, |max, &e| e.max(max));
    assert!(
        max > f64::MIN_POSITIVE,
        "image maximum is zero, cannot normalise"
    );
    let levels = ((1u32 << bit_depth) - 1) as f64;
    image.mapv(|e| (e / max * levels) as u16)
}

#[cfg(test)]
mod tests {
    use super::{bin_pixels, intensity, quantize};
    use crate::beam::{diagonal_polarization, gaussian_beam};
    use crate::JonesField;
    use ndarray::{arr2, Array2};
    use num_complex::Complex;

    #[test]
    fn intensity_sums_both_components() {
        let field = JonesField {
            h: Array2::from_elem((2, 2), Complex::new(3.0, 0.0)),
            v: Array2::from_elem((2, 2), Complex::new(0.0, 4.0)),
            pitch: 1e-6,
        };
        let image = intensity(&field);
        for e in image.iter() {
            assert_eq!(*e, 25.0);
        }
    }

    #[test]
    fn intensity_ignores_relative_phase() {
        let polarized = diagonal_polarization(gaussian_beam(8, 8, 1e-6, 3e-6, 3e-6));
        let mut shifted = polarized.clone();
        // a pure phase on one arm must not change the detected image
        shifted.h.map_inplace(|e| *e *= Complex::new(0.0, 1.0));
        let a = intensity(&polarized);
        let b = intensity(&shifted);
        for (a, b) in a.iter().zip(b.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn binning_averages_uniform_blocks_exactly() {
        let image = Array2::from_elem((4, 4), 3.5);
        let binned = bin_pixels(image, 1.0, 2.0);
        assert_eq!(binned.dim(), (2, 2));
        for e in binned.iter() {
            assert_eq!(*e, 3.5);
        }
    }

    #[test]
    fn binning_drops_trailing_remainder() {
        let image = Array2::from_elem((5, 7), 1.0);
        let binned = bin_pixels(image, 1.0, 2.0);
        assert_eq!(binned.dim(), (2, 3));
    }

    #[test]
    fn bin_factor_below_two_is_identity() {
        let image = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let same = bin_pixels(image.clone(), 1.0, 1.9);
        assert_eq!(same, image);
        // detector pixels smaller than simulation pixels also pass through
        let same = bin_pixels(image.clone(), 2.0, 1.0);
        assert_eq!(same, image);
    }

    #[test]
    fn binning_averages_distinct_values() {
        let image = arr2(&[[1.0, 3.0], [5.0, 7.0]]);
        let binned = bin_pixels(image, 1.0, 2.0);
        assert_eq!(binned.dim(), (1, 1));
        assert_eq!(binned[[0, 0]], 4.0);
    }

    #[test]
    fn quantize_puts_the_peak_at_full_scale() {
        let image = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let q = quantize(&image, 8);
        assert_eq!(q, arr2(&[[63u16, 127], [191, 255]]));

        let q = quantize(&image, 12);
        assert_eq!(q[[1, 1]], 4095);

        let q = quantize(&image, 1);
        assert_eq!(q, arr2(&[[0u16, 0], [0, 1]]));
    }

    #[test]
    fn quantize_is_invariant_to_global_scale() {
        let image = arr2(&[[0.5, 1.0], [1.5, 2.0]]);
        let scaled = image.mapv(|e| e * 1e-9);
        assert_eq!(quantize(&image, 10), quantize(&scaled, 10));
    }

    #[test]
    #[should_panic(expected = "maximum is zero")]
    fn quantize_rejects_blank_images() {
        let image = Array2::zeros((4, 4));
        quantize(&image, 8);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn quantize_rejects_zero_bit_depth() {
        let image = arr2(&[[1.0]]);
        quantize(&image, 0);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn quantize_rejects_depths_beyond_16() {
        let image = arr2(&[[1.0]]);
        quantize(&image, 17);
    }
}
