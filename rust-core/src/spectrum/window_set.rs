//! The four analysis windows used by reassignment
//!
//! All of them derive from one base window h[n]:
//! - standard: h[n]
//! - derivative: (h[n+1] - h[n-1]) / 2
//! - time-weighted: h[n] * (n - N/2 [+ 0.5]), scaled to a peak magnitude of 1
//! - derivative-time-weighted: derivative[n] * n

use super::windows::{fill_window, WindowType};
use crate::config::{AnalysisConfig, ConfigError};

/// How the centered difference treats the first and last sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivativeBoundary {
    /// Indices wrap modulo N (the window is treated as one period)
    #[default]
    Circular,

    /// The derivative is forced to zero at n = 0 and n = N-1
    Zero,
}

/// Parameters that shape the window set besides its length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowOptions {
    pub window_type: WindowType,
    pub derivative_boundary: DerivativeBoundary,
    pub half_sample_offset: bool,
}

impl From<&AnalysisConfig> for WindowOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            window_type: config.window_type,
            derivative_boundary: config.derivative_boundary,
            half_sample_offset: config.half_sample_offset,
        }
    }
}

/// Owner of the standard, derivative, time-weighted and
/// derivative-time-weighted windows
///
/// Rebuilding takes `&mut self`, so no reader can ever see the four
/// windows at different lengths.
#[derive(Debug, Clone)]
pub struct WindowSet {
    options: WindowOptions,
    standard: Vec<f64>,
    derivative: Vec<f64>,
    time_weighted: Vec<f64>,
    derivative_time_weighted: Vec<f64>,

    /// Peak magnitude removed from the time-weighted window
    time_scale: f64,

    /// Mean of the standard window, sum(h) / N
    coherent_gain: f64,
}

impl WindowSet {
    /// Create and build a window set for `fft_size`
    pub fn new(options: WindowOptions, fft_size: usize) -> Result<Self, ConfigError> {
        let mut set = Self {
            options,
            standard: Vec::new(),
            derivative: Vec::new(),
            time_weighted: Vec::new(),
            derivative_time_weighted: Vec::new(),
            time_scale: 1.0,
            coherent_gain: 1.0,
        };
        set.rebuild(fft_size)?;
        Ok(set)
    }

    /// Regenerate all four windows for `fft_size`
    ///
    /// Deterministic: the result depends only on `fft_size` and the options.
    /// Buffers are reused, so rebuilding at an unchanged size never allocates.
    pub fn rebuild(&mut self, fft_size: usize) -> Result<(), ConfigError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(ConfigError::InvalidFftSize(fft_size));
        }

        self.standard.resize(fft_size, 0.0);
        self.derivative.resize(fft_size, 0.0);
        self.time_weighted.resize(fft_size, 0.0);
        self.derivative_time_weighted.resize(fft_size, 0.0);

        fill_window(self.options.window_type, &mut self.standard);
        self.coherent_gain = self.standard.iter().sum::<f64>() / fft_size as f64;
        self.build_derivative();
        self.build_time_weighted();

        for (n, (dt, &d)) in self
            .derivative_time_weighted
            .iter_mut()
            .zip(self.derivative.iter())
            .enumerate()
        {
            *dt = d * n as f64;
        }

        Ok(())
    }

    /// Replace the options and rebuild at `fft_size`, reusing the buffers
    ///
    /// An invalid size is rejected before the options change.
    pub fn reconfigure(&mut self, options: WindowOptions, fft_size: usize) -> Result<(), ConfigError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(ConfigError::InvalidFftSize(fft_size));
        }

        self.options = options;
        self.rebuild(fft_size)
    }

    fn build_derivative(&mut self) {
        let n = self.standard.len();
        let w = &self.standard;

        for i in 0..n {
            self.derivative[i] = match self.options.derivative_boundary {
                DerivativeBoundary::Circular => {
                    let previous = w[(i + n - 1) % n];
                    let next = w[(i + 1) % n];
                    (next - previous) / 2.0
                }
                DerivativeBoundary::Zero if i == 0 || i == n - 1 => 0.0,
                DerivativeBoundary::Zero => (w[i + 1] - w[i - 1]) / 2.0,
            };
        }
    }

    fn build_time_weighted(&mut self) {
        let center = self.time_center();
        let mut peak = 0.0_f64;

        for (i, (tw, &w)) in self.time_weighted.iter_mut().zip(self.standard.iter()).enumerate() {
            *tw = w * (i as f64 - center);
            peak = peak.max(tw.abs());
        }

        // A window with no support away from its center has nothing to scale
        self.time_scale = if peak > 0.0 { peak } else { 1.0 };
        for tw in self.time_weighted.iter_mut() {
            *tw /= self.time_scale;
        }
    }

    /// Window length (FFT size)
    pub fn len(&self) -> usize {
        self.standard.len()
    }

    /// Always false once built; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty()
    }

    pub fn options(&self) -> WindowOptions {
        self.options
    }

    pub fn standard(&self) -> &[f64] {
        &self.standard
    }

    pub fn derivative(&self) -> &[f64] {
        &self.derivative
    }

    pub fn time_weighted(&self) -> &[f64] {
        &self.time_weighted
    }

    pub fn derivative_time_weighted(&self) -> &[f64] {
        &self.derivative_time_weighted
    }

    /// Factor that converts time-weighted spectra back to sample units
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Amplitude a bin-centered unit sinusoid reads after the N/2 normalization,
    /// halved by the mirror bin (0.5 for Hann, 1.0 for Rectangular)
    pub fn coherent_gain(&self) -> f64 {
        self.coherent_gain
    }

    /// Sample index the time-weighted window treats as t = 0
    pub fn time_center(&self) -> f64 {
        let half = (self.standard.len() / 2) as f64;
        if self.options.half_sample_offset {
            half - 0.5
        } else {
            half
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(fft_size: usize, boundary: DerivativeBoundary) -> WindowSet {
        let options = WindowOptions { derivative_boundary: boundary, ..Default::default() };
        WindowSet::new(options, fft_size).unwrap()
    }

    #[test]
    fn test_all_windows_match_fft_size() {
        for order in 1..=13 {
            let fft_size = 1usize << order;
            let set = build(fft_size, DerivativeBoundary::Circular);

            assert_eq!(set.standard().len(), fft_size);
            assert_eq!(set.derivative().len(), fft_size);
            assert_eq!(set.time_weighted().len(), fft_size);
            assert_eq!(set.derivative_time_weighted().len(), fft_size);
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let mut set = build(1024, DerivativeBoundary::Circular);
        let first = set.clone();

        set.rebuild(512).unwrap();
        set.rebuild(1024).unwrap();

        assert_eq!(set.standard(), first.standard());
        assert_eq!(set.derivative(), first.derivative());
        assert_eq!(set.time_weighted(), first.time_weighted());
        assert_eq!(set.derivative_time_weighted(), first.derivative_time_weighted());
        assert_eq!(set.time_scale(), first.time_scale());
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        let mut set = build(256, DerivativeBoundary::Circular);

        assert_eq!(set.rebuild(0), Err(ConfigError::InvalidFftSize(0)));
        assert_eq!(set.rebuild(1), Err(ConfigError::InvalidFftSize(1)));
        assert_eq!(set.rebuild(300), Err(ConfigError::InvalidFftSize(300)));

        // Rejected rebuilds leave the previous windows in place
        assert_eq!(set.len(), 256);
    }

    #[test]
    fn test_derivative_sums_to_zero() {
        for boundary in [DerivativeBoundary::Circular, DerivativeBoundary::Zero] {
            let set = build(1024, boundary);
            let sum: f64 = set.derivative().iter().sum();
            assert!(sum.abs() < 1e-4, "{:?}: {}", boundary, sum);
        }
    }

    #[test]
    fn test_circular_boundary() {
        let set = build(64, DerivativeBoundary::Circular);
        let w = set.standard();
        let d = set.derivative();

        assert!((d[0] - (w[1] - w[63]) / 2.0).abs() < 1e-15);
        assert!((d[63] - (w[0] - w[62]) / 2.0).abs() < 1e-15);

        // Periodic Hann is symmetric around index 0, so its slope there is zero
        assert!(d[0].abs() < 1e-15);
        assert!(d[63] < 0.0);
    }

    #[test]
    fn test_zero_boundary() {
        let set = build(64, DerivativeBoundary::Zero);
        let w = set.standard();
        let d = set.derivative();

        assert_eq!(d[0], 0.0);
        assert_eq!(d[63], 0.0);
        assert!((d[1] - (w[2] - w[0]) / 2.0).abs() < 1e-15);
        assert!((d[62] - (w[63] - w[61]) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_time_weighted_peak_is_one() {
        for half_sample_offset in [false, true] {
            let options = WindowOptions { half_sample_offset, ..Default::default() };
            let set = WindowSet::new(options, 512).unwrap();

            let peak = set.time_weighted().iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
            assert!((peak - 1.0).abs() < 1e-12);
            assert!(set.time_scale() > 1.0);

            // Undoing the scale recovers h[n] * (n - center)
            let center = set.time_center();
            for n in [10, 200, 400] {
                let expected = set.standard()[n] * (n as f64 - center);
                assert!((set.time_weighted()[n] * set.time_scale() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_derivative_time_weighted_uses_raw_index() {
        let set = build(128, DerivativeBoundary::Circular);
        for n in 0..128 {
            assert_eq!(set.derivative_time_weighted()[n], set.derivative()[n] * n as f64);
        }
    }

    #[test]
    fn test_smallest_size() {
        let set = build(2, DerivativeBoundary::Circular);
        assert_eq!(set.len(), 2);
        assert_eq!(set.time_scale(), 1.0);
        assert!(set.time_weighted().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_reconfigure_reuses_buffers() {
        let mut set = build(64, DerivativeBoundary::Circular);
        let ptr = set.standard().as_ptr();

        let zero_boundary = WindowOptions {
            derivative_boundary: DerivativeBoundary::Zero,
            ..Default::default()
        };
        set.reconfigure(zero_boundary, 64).unwrap();

        assert_eq!(set.len(), 64);
        assert_eq!(set.derivative()[63], 0.0);
        assert_eq!(set.standard().as_ptr(), ptr);
    }

    #[test]
    fn test_reconfigure_rejects_size_before_touching_options() {
        let mut set = build(64, DerivativeBoundary::Circular);
        let zero_boundary = WindowOptions {
            derivative_boundary: DerivativeBoundary::Zero,
            ..Default::default()
        };

        assert_eq!(set.reconfigure(zero_boundary, 48), Err(ConfigError::InvalidFftSize(48)));
        assert_eq!(set.options().derivative_boundary, DerivativeBoundary::Circular);
        assert!(set.derivative()[63] < 0.0);
    }

    #[test]
    fn test_coherent_gain() {
        let expected = [
            (WindowType::Hann, 0.5),
            (WindowType::Hamming, 0.54),
            (WindowType::Blackman, 0.42),
            (WindowType::Rectangular, 1.0),
        ];

        for (window_type, gain) in expected {
            let options = WindowOptions { window_type, ..Default::default() };
            let set = WindowSet::new(options, 1024).unwrap();
            assert!((set.coherent_gain() - gain).abs() < 1e-12, "{:?}", window_type);
        }
    }
}
