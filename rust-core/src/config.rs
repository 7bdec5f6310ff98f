//! Analysis configuration
//!
//! Plain configuration values handed to the engine by whatever stores and
//! automates parameters on the host side.

use crate::spectrum::windows::WindowType;
use crate::spectrum::window_set::DerivativeBoundary;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be a power of two >= 2 (got {0})")]
    InvalidFftSize(usize),

    #[error("Sample rate must be positive and finite (got {0} Hz)")]
    InvalidSampleRate(f64),

    #[error("Despeckling cutoff must be non-negative and finite (got {0})")]
    InvalidDespecklingCutoff(f64),

    #[error("Noise floor must be finite (got {0} dB)")]
    InvalidNoiseFloor(f64),
}

/// Unit of the reported magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagnitudeScale {
    /// Linear gain: a full-scale sinusoid reads 1.0 under any window type
    #[default]
    Linear,

    /// 20*log10 of the linear gain, -inf below the noise floor
    Decibels,
}

/// Origin of the reported reassigned times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeReference {
    /// Seconds since the first sample of the analyzed slice
    #[default]
    BufferStart,

    /// Seconds relative to the end of the analyzed slice (past is negative)
    BufferEnd,
}

/// Reassignment engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// FFT size (number of samples, power of two >= 2)
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Maximum distance of the mixed phase derivative from both the
    /// sinusoid (0) and impulse (-1) signatures before a bin is despeckled
    ///
    /// Measured in units of the mixed derivative, with the two signatures 1.0
    /// apart. At 0.5 or more every bin between them is kept, and larger values
    /// only admit bins outside [-1, 0]. The plugin-style 0-10 control (default
    /// 1.0) is a different scale and does not map onto this one directly.
    pub despeckling_cutoff: f64,

    /// Magnitudes below this level are reported as silence in decibel mode
    pub noise_floor_db: f64,

    /// Base window the four analysis windows are derived from
    pub window_type: WindowType,

    /// Boundary handling of the derivative window
    pub derivative_boundary: DerivativeBoundary,

    /// Shift the time-weighted window's index by half a sample
    pub half_sample_offset: bool,

    /// Linear or decibel magnitudes
    pub magnitude_scale: MagnitudeScale,

    /// Origin of reported times
    pub time_reference: TimeReference,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            sample_rate: 48000.0,
            despeckling_cutoff: 0.25,
            noise_floor_db: -48.0,
            window_type: WindowType::Hann,
            derivative_boundary: DerivativeBoundary::Circular,
            half_sample_offset: false,
            magnitude_scale: MagnitudeScale::Linear,
            time_reference: TimeReference::BufferStart,
        }
    }
}

impl AnalysisConfig {
    /// Check every field, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::InvalidFftSize(self.fft_size));
        }

        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }

        if !(self.despeckling_cutoff.is_finite() && self.despeckling_cutoff >= 0.0) {
            return Err(ConfigError::InvalidDespecklingCutoff(self.despeckling_cutoff));
        }

        if !self.noise_floor_db.is_finite() {
            return Err(ConfigError::InvalidNoiseFloor(self.noise_floor_db));
        }

        Ok(())
    }

    /// Number of positive-frequency bins reported per frame
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Width of one frequency bin in Hz
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }

    /// True when the window set has to be rebuilt to go from `self` to `other`
    pub(crate) fn windows_differ(&self, other: &AnalysisConfig) -> bool {
        self.fft_size != other.fft_size
            || self.window_type != other.window_type
            || self.derivative_boundary != other.derivative_boundary
            || self.half_sample_offset != other.half_sample_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_bins(), 1024);
        assert!((config.bin_width_hz() - 23.4375).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_fft_sizes() {
        for size in [0, 1, 3, 1000, 1536] {
            let config = AnalysisConfig { fft_size: size, ..Default::default() };
            assert_eq!(config.validate(), Err(ConfigError::InvalidFftSize(size)));
        }

        let config = AnalysisConfig { fft_size: 2, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        for rate in [0.0, -44100.0, f64::NAN, f64::INFINITY] {
            let config = AnalysisConfig { sample_rate: rate, ..Default::default() };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidSampleRate(_))));
        }
    }

    #[test]
    fn test_rejects_bad_cutoff_and_floor() {
        let config = AnalysisConfig { despeckling_cutoff: -0.1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDespecklingCutoff(_))));

        let config = AnalysisConfig { noise_floor_db: f64::NEG_INFINITY, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidNoiseFloor(_))));

        // Zero cutoff is allowed: only exact signatures survive
        let config = AnalysisConfig { despeckling_cutoff: 0.0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_windows_differ() {
        let a = AnalysisConfig::default();
        let b = AnalysisConfig { despeckling_cutoff: 2.0, noise_floor_db: -60.0, ..a.clone() };
        assert!(!a.windows_differ(&b));

        let c = AnalysisConfig { fft_size: 4096, ..a.clone() };
        assert!(a.windows_differ(&c));

        let d = AnalysisConfig { derivative_boundary: DerivativeBoundary::Zero, ..a.clone() };
        assert!(a.windows_differ(&d));
    }
}
