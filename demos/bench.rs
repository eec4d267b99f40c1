use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use ndarray::{Array2, ArrayView2};
use num_complex::Complex;
use palette::{Lch, Srgb};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vectorial_angular_spectrum::beam::{diagonal_polarization, gaussian_beam};
use vectorial_angular_spectrum::config::BenchConfig;
use vectorial_angular_spectrum::detector::{bin_pixels, intensity, quantize};
use vectorial_angular_spectrum::elements::{
    apply_lens, apply_pbs, apply_phase_mask, apply_waveplate, Polarization,
};
use vectorial_angular_spectrum::mask::{embed_mask_in_grid, generate_block_mask};
use vectorial_angular_spectrum::propagate_vector;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BenchConfig::default();
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    info!(
        grid = config.grid_size,
        pitch = config.pixel_pitch,
        wavelength = config.wavelength,
        seed = config.seed,
        "setting up bench"
    );

    let beam = gaussian_beam(
        config.grid_size,
        config.grid_size,
        config.pixel_pitch,
        config.waist_x,
        config.waist_y,
    );
    save_real_image("bench_input.png", beam.values.map(|e| e.norm_sqr()).view())?;
    let mut field = diagonal_polarization(beam);

    // first SLM writes onto the horizontal component only
    let slm1 = embed_mask_in_grid(
        generate_block_mask(
            config.mask_height,
            config.mask_width,
            config.mask_block_size,
            &mut rng,
        )
        .view(),
        config.grid_size,
    );
    field = apply_phase_mask(field, slm1.view(), Polarization::Horizontal);
    field = propagate_vector(
        field,
        config.slm_separation,
        config.wavelength,
        config.pad_factor,
    );

    // the wave plate mixes the components, so the second mask affects light
    // that originated in both arms
    field = apply_waveplate(field, config.waveplate_angle_deg);
    let slm2 = embed_mask_in_grid(
        generate_block_mask(
            config.mask_height,
            config.mask_width,
            config.mask_block_size,
            &mut rng,
        )
        .view(),
        config.grid_size,
    );
    field = apply_phase_mask(field, slm2.view(), Polarization::Horizontal);

    field = apply_lens(field, config.focal_length, config.wavelength);
    field = propagate_vector(
        field,
        config.detector_distance,
        config.wavelength,
        config.pad_factor,
    );
    save_complex_image("bench_field_h.png", field.h.view())?;
    save_complex_image("bench_field_v.png", field.v.view())?;

    let (transmitted, reflected) = apply_pbs(field);
    info!(
        transmitted_flux = transmitted.intensity_integral(),
        reflected_flux = reflected.intensity_integral(),
        "split at the polarizing beam splitter"
    );

    let image = intensity(&transmitted);
    let binned = bin_pixels(image, config.pixel_pitch, config.detector_pixel_size);
    let quantized = quantize(&binned, config.bit_depth);
    save_detector_image("bench_detector.png", &quantized, config.bit_depth)?;
    info!(
        rows = quantized.dim().0,
        columns = quantized.dim().1,
        "wrote bench_detector.png"
    );

    Ok(())
}

fn save_detector_image<T: AsRef<std::path::Path> + std::fmt::Debug>(
    file_name: T,
    arr: &Array2<u16>,
    bit_depth: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let (h, w) = arr.dim();
    if bit_depth <= 8 {
        let data: Vec<u8> = arr.iter().map(|&v| v as u8).collect();
        let img = GrayImage::from_raw(w as u32, h as u32, data)
            .ok_or("detector buffer does not match its shape")?;
        img.save(file_name)?;
    } else {
        let data: Vec<u16> = arr.iter().copied().collect();
        let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, data)
            .ok_or("detector buffer does not match its shape")?;
        DynamicImage::ImageLuma16(img).save(file_name)?;
    }
    Ok(())
}

fn save_real_image<T: AsRef<std::path::Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let &[h, w, ..] = arr.shape() {
        let max: f64 = arr.iter().fold(0.0, |max, val| val.max(max));
        let sum: f64 = arr.iter().fold(0.0, |sum, val| val + sum);
        info!(h, w, max, sum, "saving {:?}", file_name);

        let mut img = RgbImage::new(w as u32, h as u32);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let value = (arr[[y as usize, x as usize]] / max).min(1.0);

            let colour = Srgb::from(Lch::new(value * 70.0, value * 128.0, 280.0 - 245.0 * value));
            *p = Rgb([
                (colour.red * 255.0) as u8,
                (colour.green * 255.0) as u8,
                (colour.blue * 255.0) as u8,
            ]);
        }

        img.save(file_name)?;
    }
    Ok(())
}

fn save_complex_image<T: AsRef<std::path::Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<Complex<f64>>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let &[h, w, ..] = arr.shape() {
        let max_sqr: f64 = arr.iter().fold(0.0, |max, val| val.norm_sqr().max(max));
        let sum_sqr: f64 = arr.iter().fold(0.0, |sum, val| val.norm_sqr() + sum);
        info!(h, w, max_sqr, sum_sqr, "saving {:?}", file_name);

        let max = max_sqr.sqrt();

        let mut img = RgbImage::new(w as u32, h as u32);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let (r, theta) = arr[[y as usize, x as usize]].to_polar();
            let r = r / max;

            // amplitude drives lightness, phase drives hue
            let colour = Srgb::from(Lch::new(
                r * 100.0,
                r * 128.0,
                360.0 * (theta / std::f64::consts::PI + 1.0) * 0.5,
            ));
            *p = Rgb([
                (colour.red * 255.0) as u8,
                (colour.green * 255.0) as u8,
                (colour.blue * 255.0) as u8,
            ]);
        }

        img.save(file_name)?;
    }
    Ok(())
}
