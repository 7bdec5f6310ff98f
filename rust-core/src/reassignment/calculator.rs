//! Per-bin time/frequency reassignment and despeckling
//!
//! For bin k with spectra X (standard window h), X_Dh (derivative window),
//! X_Th (time-weighted window) and X_TDh (derivative-time-weighted window):
//!
//! - frequency correction: -Im(X_Dh * conj(X) / |X|²) * fs / 2π
//! - time correction: Re(X_Th * conj(X) / |X|²) * time_scale / fs
//!
//! The mixed partial phase derivative classifies each bin. It is -1 for an
//! impulse and 0 for a sinusoid; bins close to neither are speckle.
//!
//! Emitted magnitudes are |X| / coherent_gain, so a full-scale sinusoid reads
//! 1.0 whichever base window is in use.

use super::output::FrameOutputMut;
use crate::config::{AnalysisConfig, MagnitudeScale};
use crate::spectrum::{SpectralFrameComputer, WindowSet};
use num_complex::Complex;
use std::f64::consts::PI;

/// Signature of an ideal impulse
pub const IMPULSE_SIGNATURE: f64 = -1.0;

/// Signature of an ideal sinusoid
pub const SINUSOID_SIGNATURE: f64 = 0.0;

/// One bin's corrected estimate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReassignedPoint {
    /// Seconds, see `TimeReference` for the origin
    pub time: f64,

    /// Hz, nominal bin center plus correction
    pub frequency: f64,

    /// Linear gain or dB depending on `MagnitudeScale`
    pub magnitude: f64,
}

/// How a bin was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinStatus {
    /// Magnitude reported
    Emitted,

    /// No energy in the bin, nominal coordinates with a silent magnitude
    Silent,

    /// Matched neither the sinusoid nor the impulse signature
    Despeckled,
}

/// Result of reassigning one bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEstimate {
    pub point: ReassignedPoint,
    pub status: BinStatus,

    /// None for silent bins
    pub mixed_derivative: Option<f64>,
}

/// The four spectrum values of one bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinSpectra {
    pub standard: Complex<f64>,
    pub derivative: Complex<f64>,
    pub time_weighted: Complex<f64>,
    pub derivative_time_weighted: Complex<f64>,
}

/// Spectra of one frame under each of the four windows
pub struct FrameSpectra {
    standard: Vec<Complex<f64>>,
    derivative: Vec<Complex<f64>>,
    time_weighted: Vec<Complex<f64>>,
    derivative_time_weighted: Vec<Complex<f64>>,
}

impl FrameSpectra {
    pub fn new(fft_size: usize) -> Self {
        let zero = Complex::new(0.0, 0.0);
        Self {
            standard: vec![zero; fft_size],
            derivative: vec![zero; fft_size],
            time_weighted: vec![zero; fft_size],
            derivative_time_weighted: vec![zero; fft_size],
        }
    }

    /// FFT size the buffers are laid out for
    pub fn len(&self) -> usize {
        self.standard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty()
    }

    /// Transform `segment` under all four windows of `windows`
    pub fn compute(
        &mut self,
        computer: &mut SpectralFrameComputer,
        windows: &WindowSet,
        segment: &[f64],
    ) {
        computer.transform(segment, windows.standard(), &mut self.standard);
        computer.transform(segment, windows.derivative(), &mut self.derivative);
        computer.transform(segment, windows.time_weighted(), &mut self.time_weighted);
        computer.transform(
            segment,
            windows.derivative_time_weighted(),
            &mut self.derivative_time_weighted,
        );
    }

    /// Spectrum values of bin `k`
    pub fn bin(&self, k: usize) -> BinSpectra {
        BinSpectra {
            standard: self.standard[k],
            derivative: self.derivative[k],
            time_weighted: self.time_weighted[k],
            derivative_time_weighted: self.derivative_time_weighted[k],
        }
    }
}

/// Turns four parallel spectra into reassigned points
#[derive(Debug, Clone, PartialEq)]
pub struct ReassignmentCalculator {
    fft_size: usize,
    sample_rate: f64,
    bin_width: f64,
    despeckling_cutoff: f64,
    noise_floor_db: f64,
    magnitude_scale: MagnitudeScale,
}

impl ReassignmentCalculator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            fft_size: config.fft_size,
            sample_rate: config.sample_rate,
            bin_width: config.bin_width_hz(),
            despeckling_cutoff: config.despeckling_cutoff,
            noise_floor_db: config.noise_floor_db,
            magnitude_scale: config.magnitude_scale,
        }
    }

    pub fn despeckling_cutoff(&self) -> f64 {
        self.despeckling_cutoff
    }

    /// Number of positive-frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Reassign every positive-frequency bin of one frame into `output`
    ///
    /// # Panics
    /// If `windows` or `spectra` were built for another FFT size.
    pub fn reassign_frame(
        &self,
        windows: &WindowSet,
        spectra: &FrameSpectra,
        frame_time: f64,
        output: &mut FrameOutputMut<'_>,
    ) {
        assert_eq!(windows.len(), self.fft_size, "stale window set");
        assert_eq!(spectra.len(), self.fft_size, "stale frame spectra");
        assert_eq!(output.len(), self.num_bins(), "output row does not match the bin count");

        for k in 0..self.num_bins() {
            let estimate = self.reassign_bin(windows, k, frame_time, spectra.bin(k));
            output.set(k, estimate.point);
        }
    }

    /// Reassign a single bin
    ///
    /// # Arguments
    /// * `windows` - Window set the spectra were computed with
    /// * `bin` - Bin index k (0 <= k < fft_size/2)
    /// * `frame_time` - Nominal time of the frame's window center in seconds
    /// * `spectra` - The four spectrum values of bin k
    pub fn reassign_bin(
        &self,
        windows: &WindowSet,
        bin: usize,
        frame_time: f64,
        spectra: BinSpectra,
    ) -> BinEstimate {
        let nominal_frequency = bin as f64 * self.bin_width;
        let x = spectra.standard;
        let magnitude_squared = x.norm_sqr();

        if magnitude_squared == 0.0 {
            return self.silent(frame_time, nominal_frequency);
        }

        let x_conj = x.conj();

        let frequency_correction_radians = -(spectra.derivative * x_conj).im / magnitude_squared;
        let frequency_correction_hz = frequency_correction_radians * self.sample_rate / (2.0 * PI);

        let time_correction_samples =
            (spectra.time_weighted * x_conj).re / magnitude_squared * windows.time_scale();
        let time_correction_seconds = time_correction_samples / self.sample_rate;

        // Time-weighted spectrum with the raw index n, the same index the
        // derivative-time-weighted window uses
        let raw_time_weighted =
            spectra.time_weighted * windows.time_scale() + x * windows.time_center();

        let t1 = (spectra.derivative_time_weighted * x_conj).re / magnitude_squared;
        let t2 = (raw_time_weighted * spectra.derivative / (x * x)).re;
        let mixed_derivative = t2 - t1 - 1.0;

        let time = frame_time + time_correction_seconds;
        let frequency = nominal_frequency + frequency_correction_hz;

        if !(time.is_finite() && frequency.is_finite() && mixed_derivative.is_finite()) {
            // Underflowing magnitudes behave like empty bins
            return self.silent(frame_time, nominal_frequency);
        }

        let distance = (mixed_derivative - SINUSOID_SIGNATURE)
            .abs()
            .min((mixed_derivative - IMPULSE_SIGNATURE).abs());

        let (magnitude, status) = if distance > self.despeckling_cutoff {
            (self.silent_magnitude(), BinStatus::Despeckled)
        } else {
            (
                self.scale_magnitude(magnitude_squared.sqrt() / windows.coherent_gain()),
                BinStatus::Emitted,
            )
        };

        BinEstimate {
            point: ReassignedPoint {
                time,
                frequency,
                magnitude,
            },
            status,
            mixed_derivative: Some(mixed_derivative),
        }
    }

    fn silent(&self, time: f64, frequency: f64) -> BinEstimate {
        BinEstimate {
            point: ReassignedPoint {
                time,
                frequency,
                magnitude: self.silent_magnitude(),
            },
            status: BinStatus::Silent,
            mixed_derivative: None,
        }
    }

    fn silent_magnitude(&self) -> f64 {
        match self.magnitude_scale {
            MagnitudeScale::Linear => 0.0,
            MagnitudeScale::Decibels => f64::NEG_INFINITY,
        }
    }

    fn scale_magnitude(&self, gain: f64) -> f64 {
        match self.magnitude_scale {
            MagnitudeScale::Linear => gain,
            MagnitudeScale::Decibels => {
                let db = 20.0 * gain.log10();
                if db < self.noise_floor_db {
                    f64::NEG_INFINITY
                } else {
                    db
                }
            }
        }
    }
}
