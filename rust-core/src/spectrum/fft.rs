//! Windowed complex FFT of one analysis frame
//!
//! Optimized for real-time use: the plan and scratch space are created once
//! per FFT size, so a transform never allocates.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Computes normalized spectra of windowed signal segments
pub struct SpectralFrameComputer {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Forward complex FFT
    fft: Arc<dyn Fft<f64>>,

    /// Reusable scratch space for in-place processing
    scratch: Vec<Complex<f64>>,
}

impl SpectralFrameComputer {
    /// Create a frame computer for `fft_size` samples
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            scratch,
        }
    }

    /// Window a segment and compute its normalized spectrum
    ///
    /// # Arguments
    /// * `segment` - Signal segment (exactly fft_size samples)
    /// * `window` - Window coefficients (exactly fft_size values)
    /// * `spectrum` - Output, fft_size complex bins divided by fft_size/2
    ///
    /// The output depends only on `segment` and `window`; the scratch space
    /// carries nothing between calls.
    pub fn transform(&mut self, segment: &[f64], window: &[f64], spectrum: &mut [Complex<f64>]) {
        assert_eq!(segment.len(), self.fft_size, "segment length must equal the FFT size");
        assert_eq!(window.len(), self.fft_size, "window length must equal the FFT size");
        assert_eq!(spectrum.len(), self.fft_size, "spectrum length must equal the FFT size");

        for ((bin, &s), &w) in spectrum.iter_mut().zip(segment).zip(window) {
            *bin = Complex::new(s * w, 0.0);
        }

        self.fft.process_with_scratch(spectrum, &mut self.scratch);

        // Energy of a real tone is split between the k and N-k bins
        let scale = 1.0 / (self.fft_size as f64 / 2.0);
        for bin in spectrum.iter_mut() {
            *bin *= scale;
        }
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::windows::{generate_window, WindowType};
    use std::f64::consts::PI;

    fn spectrum_of(signal: &[f64], window: &[f64]) -> Vec<Complex<f64>> {
        let mut computer = SpectralFrameComputer::new(signal.len());
        let mut spectrum = vec![Complex::new(0.0, 0.0); signal.len()];
        computer.transform(signal, window, &mut spectrum);
        spectrum
    }

    #[test]
    fn test_dc_signal() {
        let signal = vec![1.0; 256];
        let window = generate_window(WindowType::Rectangular, 256);
        let spectrum = spectrum_of(&signal, &window);

        // N / (N/2)
        assert!((spectrum[0].re - 2.0).abs() < 1e-12);
        assert!(spectrum[10].norm() < 1e-12);
    }

    #[test]
    fn test_bin_centered_sine_normalization() {
        let fft_size = 1024;
        let bin = 64;
        let signal: Vec<f64> = (0..fft_size)
            .map(|n| (2.0 * PI * bin as f64 * n as f64 / fft_size as f64).sin())
            .collect();

        let rect = generate_window(WindowType::Rectangular, fft_size);
        let spectrum = spectrum_of(&signal, &rect);
        assert!((spectrum[bin].norm() - 1.0).abs() < 1e-9);
        assert!((spectrum[fft_size - bin].norm() - 1.0).abs() < 1e-9);

        // Hann halves the coherent gain; reassignment doubles it back
        let hann = generate_window(WindowType::Hann, fft_size);
        let spectrum = spectrum_of(&signal, &hann);
        assert!((spectrum[bin].norm() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_transform_is_pure() {
        let fft_size = 128;
        let signal: Vec<f64> = (0..fft_size).map(|n| ((n * 7) % 13) as f64 - 6.0).collect();
        let window = generate_window(WindowType::Blackman, fft_size);
        let other = generate_window(WindowType::Hamming, fft_size);

        let mut computer = SpectralFrameComputer::new(fft_size);
        let mut first = vec![Complex::new(0.0, 0.0); fft_size];
        let mut between = vec![Complex::new(0.0, 0.0); fft_size];
        let mut second = vec![Complex::new(0.0, 0.0); fft_size];

        computer.transform(&signal, &window, &mut first);
        computer.transform(&signal, &other, &mut between);
        computer.transform(&signal, &window, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "window length")]
    fn test_mismatched_window_panics() {
        let mut computer = SpectralFrameComputer::new(64);
        let mut spectrum = vec![Complex::new(0.0, 0.0); 64];
        computer.transform(&[0.0; 64], &[1.0; 32], &mut spectrum);
    }
}
