//! Windows, windowed FFT and framing for reassignment analysis

pub mod fft;
pub mod framer;
pub mod window_set;
pub mod windows;

pub use fft::SpectralFrameComputer;
pub use framer::Framer;
pub use window_set::{DerivativeBoundary, WindowOptions, WindowSet};
pub use windows::{generate_window, WindowType};
