//! Base window functions for spectral analysis
//!
//! All windows are generated in DFT-even (periodic) form: w[n] for a length M
//! window uses a period of M, so w[M/2 + j] == w[M/2 - j] and the taper is
//! zero-phase about the center index M/2.

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/M)
    /// Sidelobe attenuation: ~31 dB, zero at both ends of the period
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/M)
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/M) + 0.08*cos(4πn/M)
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let mut window = vec![0.0; length];
    fill_window(window_type, &mut window);
    window
}

/// Fill an existing buffer with window coefficients (no allocation)
pub fn fill_window(window_type: WindowType, window: &mut [f64]) {
    let m = window.len() as f64;

    match window_type {
        WindowType::Hann => {
            for (n, w) in window.iter_mut().enumerate() {
                let angle = 2.0 * PI * n as f64 / m;
                *w = 0.5 - 0.5 * angle.cos();
            }
        }

        WindowType::Hamming => {
            for (n, w) in window.iter_mut().enumerate() {
                let angle = 2.0 * PI * n as f64 / m;
                *w = 0.54 - 0.46 * angle.cos();
            }
        }

        WindowType::Blackman => {
            for (n, w) in window.iter_mut().enumerate() {
                let angle1 = 2.0 * PI * n as f64 / m;
                let angle2 = 4.0 * PI * n as f64 / m;
                *w = 0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos();
            }
        }

        WindowType::Rectangular => window.fill(1.0),
    }
}
