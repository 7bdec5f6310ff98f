//! Reassignment engine
//!
//! Owns the window set, FFT plan, per-frame spectra and output store for one
//! signal path. Analysis is synchronous and allocation-free once the output
//! shape has settled; reconfiguration is atomic.

use super::calculator::{FrameSpectra, ReassignmentCalculator};
use super::output::OutputStore;
use crate::config::{AnalysisConfig, ConfigError, TimeReference};
use crate::spectrum::{Framer, SpectralFrameComputer, WindowOptions, WindowSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Need at least {required} samples for one frame (got {available})")]
    InsufficientSamples { required: usize, available: usize },
}

/// Spectral reassignment engine for one channel
pub struct ReassignmentEngine {
    config: AnalysisConfig,
    windows: WindowSet,
    computer: SpectralFrameComputer,
    framer: Framer,
    spectra: FrameSpectra,
    calculator: ReassignmentCalculator,
    output: OutputStore,
}

impl ReassignmentEngine {
    /// Create an engine, validating `config` first
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let fft_size = config.fft_size;
        let windows = WindowSet::new(WindowOptions::from(&config), fft_size)?;

        debug!(fft_size, sample_rate = config.sample_rate, "reassignment engine created");

        Ok(Self {
            windows,
            computer: SpectralFrameComputer::new(fft_size),
            framer: Framer::new(fft_size),
            spectra: FrameSpectra::new(fft_size),
            calculator: ReassignmentCalculator::new(&config),
            output: OutputStore::new(1, config.num_bins()),
            config,
        })
    }

    /// Apply a new configuration
    ///
    /// Either every part of the engine moves to `config` or, on error,
    /// nothing changes. Identical configurations are a no-op.
    pub fn reconfigure(&mut self, config: AnalysisConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected reassignment configuration");
            return Err(err);
        }

        if config == self.config {
            return Ok(());
        }

        // The window set rejects a bad size before touching its buffers, so
        // nothing has changed yet if this fails
        if self.config.windows_differ(&config) {
            self.windows
                .reconfigure(WindowOptions::from(&config), config.fft_size)?;
            debug!(
                fft_size = config.fft_size,
                window = ?config.window_type,
                boundary = ?config.derivative_boundary,
                "rebuilt analysis windows"
            );
        }

        if config.fft_size != self.config.fft_size {
            self.computer = SpectralFrameComputer::new(config.fft_size);
            self.framer = Framer::new(config.fft_size);
            self.spectra = FrameSpectra::new(config.fft_size);
            self.output.ensure_capacity(self.output.rows(), config.num_bins());
        }

        self.calculator = ReassignmentCalculator::new(&config);
        self.config = config;

        debug!(
            fft_size = self.config.fft_size,
            despeckling_cutoff = self.config.despeckling_cutoff,
            noise_floor_db = self.config.noise_floor_db,
            "reassignment engine reconfigured"
        );

        Ok(())
    }

    /// Change only the FFT size
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), ConfigError> {
        self.reconfigure(AnalysisConfig { fft_size, ..self.config.clone() })
    }

    /// Change only the despeckling cutoff
    pub fn set_despeckling_cutoff(&mut self, despeckling_cutoff: f64) -> Result<(), ConfigError> {
        self.reconfigure(AnalysisConfig { despeckling_cutoff, ..self.config.clone() })
    }

    /// Change only the noise floor
    pub fn set_noise_floor_db(&mut self, noise_floor_db: f64) -> Result<(), ConfigError> {
        self.reconfigure(AnalysisConfig { noise_floor_db, ..self.config.clone() })
    }

    /// Reassign one frame taken from the first `fft_size` samples of `samples`
    ///
    /// The result is row 0 of the returned store: `fft_size / 2` times,
    /// frequencies and magnitudes, index-aligned by bin.
    pub fn analyze_frame(&mut self, samples: &[f64]) -> Result<&OutputStore, AnalysisError> {
        let fft_size = self.config.fft_size;
        if samples.len() < fft_size {
            return Err(AnalysisError::InsufficientSamples {
                required: fft_size,
                available: samples.len(),
            });
        }

        self.output.ensure_capacity(1, self.config.num_bins());

        let segment = &samples[..fft_size];
        let frame_time = self.frame_time(0, fft_size);

        self.spectra.compute(&mut self.computer, &self.windows, segment);
        self.calculator.reassign_frame(
            &self.windows,
            &self.spectra,
            frame_time,
            &mut self.output.frame_mut(0),
        );

        Ok(&self.output)
    }

    /// Reassign every hop-spaced frame of `buffer`
    ///
    /// Returns the number of frames written; a buffer shorter than one
    /// frame yields zero rows.
    pub fn analyze_frames(&mut self, buffer: &[f64]) -> usize {
        let framer = self.framer;
        let num_frames = framer.num_frames(buffer.len());

        self.output.ensure_capacity(num_frames, self.config.num_bins());

        for (index, segment) in framer.frames(buffer).enumerate() {
            let frame_time = self.frame_time(framer.frame_start(index), buffer.len());

            self.spectra.compute(&mut self.computer, &self.windows, segment);
            self.calculator.reassign_frame(
                &self.windows,
                &self.spectra,
                frame_time,
                &mut self.output.frame_mut(index),
            );
        }

        num_frames
    }

    /// Nominal time of the window center of a frame starting at `frame_start`
    fn frame_time(&self, frame_start: usize, buffer_len: usize) -> f64 {
        let sample_rate = self.config.sample_rate;
        let center = (frame_start as f64 + self.windows.time_center()) / sample_rate;

        match self.config.time_reference {
            TimeReference::BufferStart => center,
            TimeReference::BufferEnd => center - buffer_len as f64 / sample_rate,
        }
    }

    /// Output of the last analysis call
    pub fn output(&self) -> &OutputStore {
        &self.output
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn windows(&self) -> &WindowSet {
        &self.windows
    }

    /// Frame spacing used by `analyze_frames`
    pub fn hop(&self) -> usize {
        self.framer.hop()
    }

    /// Number of bins per frame
    pub fn num_bins(&self) -> usize {
        self.config.num_bins()
    }
}
