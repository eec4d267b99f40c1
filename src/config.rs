use thiserror::Error;

/// Rejected configuration values, reported before any allocation happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroSize { name: &'static str },
    #[error("mask size {height}x{width} exceeds grid size {grid}")]
    MaskExceedsGrid {
        height: usize,
        width: usize,
        grid: usize,
    },
    #[error("bit depth {0} outside supported range 1..=16")]
    InvalidBitDepth(u32),
    #[error("focal length must be non-zero")]
    ZeroFocalLength,
}

/// Full description of one bench run: source beam, two SLM masks, the optics
/// between them and the detector. Distances are in metres, angles in degrees.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Simulation grid is `grid_size` x `grid_size` samples.
    pub grid_size: usize,
    /// Sample spacing of the simulation grid.
    pub pixel_pitch: f64,
    pub wavelength: f64,
    pub waist_x: f64,
    pub waist_y: f64,
    /// SLM mask extent in samples, embedded centred in the grid.
    pub mask_height: usize,
    pub mask_width: usize,
    pub mask_block_size: usize,
    /// Distance from the first SLM to the wave plate and second SLM.
    pub slm_separation: f64,
    pub focal_length: f64,
    pub waveplate_angle_deg: f64,
    /// Distance from the lens to the detector plane.
    pub detector_distance: f64,
    pub detector_pixel_size: f64,
    pub bit_depth: u32,
    /// Propagations run on a grid enlarged by this factor per axis.
    pub pad_factor: usize,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> BenchConfig {
        BenchConfig {
            grid_size: 512,
            pixel_pitch: 8e-6,
            wavelength: 633e-9,
            waist_x: 0.4e-3,
            waist_y: 0.4e-3,
            mask_height: 384,
            mask_width: 384,
            mask_block_size: 8,
            slm_separation: 0.05,
            focal_length: 0.1,
            waveplate_angle_deg: 22.5,
            detector_distance: 0.1,
            detector_pixel_size: 16e-6,
            bit_depth: 8,
            pad_factor: 2,
            seed: 1,
        }
    }
}

impl BenchConfig {
    /// Checks every field the bench relies on, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroSize { name: "grid size" });
        }
        if self.mask_block_size == 0 {
            return Err(ConfigError::ZeroSize {
                name: "mask block size",
            });
        }
        if self.pad_factor == 0 {
            return Err(ConfigError::ZeroSize { name: "pad factor" });
        }
        for &(name, value) in &[
            ("pixel pitch", self.pixel_pitch),
            ("wavelength", self.wavelength),
            ("waist x", self.waist_x),
            ("waist y", self.waist_y),
            ("detector pixel size", self.detector_pixel_size),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.focal_length == 0.0 {
            return Err(ConfigError::ZeroFocalLength);
        }
        if self.mask_height >= self.grid_size || self.mask_width >= self.grid_size {
            return Err(ConfigError::MaskExceedsGrid {
                height: self.mask_height,
                width: self.mask_width,
                grid: self.grid_size,
            });
        }
        if !(1..=16).contains(&self.bit_depth) {
            return Err(ConfigError::InvalidBitDepth(self.bit_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BenchConfig, ConfigError};

    #[test]
    fn default_config_validates() {
        assert_eq!(BenchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn non_positive_pitch_is_rejected() {
        let mut config = BenchConfig::default();
        config.pixel_pitch = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "pixel pitch",
                value: 0.0
            })
        );
        config.pixel_pitch = -1e-6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn nan_wavelength_is_rejected() {
        let mut config = BenchConfig::default();
        config.wavelength = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn oversized_mask_is_rejected() {
        let mut config = BenchConfig::default();
        config.mask_height = config.grid_size;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaskExceedsGrid {
                height: config.grid_size,
                width: config.mask_width,
                grid: config.grid_size
            })
        );
    }

    #[test]
    fn bad_bit_depths_are_rejected() {
        let mut config = BenchConfig::default();
        config.bit_depth = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBitDepth(0)));
        config.bit_depth = 17;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBitDepth(17)));
        config.bit_depth = 16;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_structural_sizes_are_rejected() {
        let mut config = BenchConfig::default();
        config.pad_factor = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSize { name: "pad factor" })
        );

        let mut config = BenchConfig::default();
        config.grid_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSize { .. })));
    }

    #[test]
    fn zero_focal_length_is_rejected() {
        let mut config = BenchConfig::default();
        config.focal_length = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFocalLength));
        // a diverging lens is legitimate
        config.focal_length = -0.1;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn messages_name_the_offending_field() {
        let error = ConfigError::MaskExceedsGrid {
            height: 600,
            width: 600,
            grid: 512,
        };
        assert_eq!(
            error.to_string(),
            "mask size 600x600 exceeds grid size 512"
        );
    }
}
