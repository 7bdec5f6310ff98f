//! Per-block driver for hosts that deliver fixed-size audio blocks
//!
//! Pushes each block into a sample history and re-runs the reassignment on
//! it, the way a plugin's process callback would.

use super::history::SampleHistory;
use crate::config::{AnalysisConfig, ConfigError};
use crate::reassignment::{AnalysisError, OutputStore, ReassignmentEngine};
use tracing::debug;

/// What each block's analysis covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// One frame over the most recent fft_size samples
    #[default]
    SingleFrame,

    /// Hop-spaced frames over the whole history
    MultiFrame,
}

/// Block-driven reassignment for one channel
pub struct BlockProcessor {
    engine: ReassignmentEngine,
    history: SampleHistory,
    mode: AnalysisMode,

    /// Requested history length; the effective one is never below fft_size
    history_len: usize,
}

impl BlockProcessor {
    /// Create a processor
    ///
    /// # Arguments
    /// * `config` - Engine configuration
    /// * `mode` - Single- or multi-frame analysis per block
    /// * `history_len` - Samples kept for analysis (raised to fft_size if smaller)
    pub fn new(config: AnalysisConfig, mode: AnalysisMode, history_len: usize) -> Result<Self, ConfigError> {
        let capacity = history_len.max(config.fft_size);
        let engine = ReassignmentEngine::new(config)?;

        Ok(Self {
            engine,
            history: SampleHistory::new(capacity),
            mode,
            history_len,
        })
    }

    /// Append a block and analyze the updated history
    ///
    /// # Returns
    /// Number of frames now held by the output store
    pub fn process_block(&mut self, block: &[f64]) -> Result<usize, AnalysisError> {
        self.history.push(block);

        match self.mode {
            AnalysisMode::SingleFrame => {
                let fft_size = self.engine.config().fft_size;
                let latest = self.history.latest(fft_size);
                self.engine.analyze_frame(latest)?;
                Ok(1)
            }
            AnalysisMode::MultiFrame => Ok(self.engine.analyze_frames(self.history.contiguous())),
        }
    }

    /// Reconfigure the engine and resize the history to match
    pub fn reconfigure(&mut self, config: AnalysisConfig) -> Result<(), ConfigError> {
        self.engine.reconfigure(config)?;
        self.sync_history();
        Ok(())
    }

    /// Change only the FFT size, keeping the history at least that long
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), ConfigError> {
        self.engine.set_fft_size(fft_size)?;
        self.sync_history();
        Ok(())
    }

    pub fn set_despeckling_cutoff(&mut self, despeckling_cutoff: f64) -> Result<(), ConfigError> {
        self.engine.set_despeckling_cutoff(despeckling_cutoff)?;
        self.sync_history();
        Ok(())
    }

    pub fn set_noise_floor_db(&mut self, noise_floor_db: f64) -> Result<(), ConfigError> {
        self.engine.set_noise_floor_db(noise_floor_db)?;
        self.sync_history();
        Ok(())
    }

    /// Change the requested history length
    pub fn set_history_len(&mut self, history_len: usize) {
        self.history_len = history_len;
        self.sync_history();
    }

    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Forget all buffered input
    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn sync_history(&mut self) {
        let capacity = self.history_len.max(self.engine.config().fft_size);
        if capacity != self.history.capacity() {
            debug!(capacity, "resizing sample history");
            self.history.resize(capacity);
        }
    }

    pub fn engine(&self) -> &ReassignmentEngine {
        &self.engine
    }

    /// Output of the last processed block
    pub fn output(&self) -> &OutputStore {
        self.engine.output()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}
