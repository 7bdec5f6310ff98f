//! Spectral Reassignment - Sharpened Time-Frequency Analysis Core
//!
//! Reassigns every FFT bin of a short audio frame to the time and frequency
//! where its energy actually concentrates, and despeckles bins that look
//! neither like a tone nor like an impulse.

pub mod audio;
pub mod config;
pub mod reassignment;
pub mod spectrum;

pub use audio::{AnalysisMode, BlockProcessor};
pub use config::{AnalysisConfig, ConfigError, MagnitudeScale, TimeReference};
pub use reassignment::{AnalysisError, OutputStore, ReassignedPoint, ReassignmentEngine};
pub use spectrum::{DerivativeBoundary, WindowSet, WindowType};
