//! Time-frequency reassignment of windowed spectra

pub mod calculator;
pub mod engine;
pub mod output;

pub use calculator::{BinEstimate, BinStatus, ReassignedPoint, ReassignmentCalculator};
pub use engine::{AnalysisError, ReassignmentEngine};
pub use output::OutputStore;
