//! Host-facing glue: sample history and block-driven processing

pub mod history;
pub mod processor;

pub use history::SampleHistory;
pub use processor::{AnalysisMode, BlockProcessor};
