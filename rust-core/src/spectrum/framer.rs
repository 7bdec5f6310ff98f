//! Hop-spaced framing for multi-frame (STFT) analysis

/// Splits a buffer into overlapping frames of `fft_size` samples, `fft_size / 4` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    fft_size: usize,
    hop: usize,
}

impl Framer {
    pub fn new(fft_size: usize) -> Self {
        Self {
            fft_size,
            hop: (fft_size / 4).max(1),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Distance in samples between consecutive frame starts
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of whole frames that fit in `len` samples (0 if `len < fft_size`)
    pub fn num_frames(&self, len: usize) -> usize {
        if len < self.fft_size {
            0
        } else {
            (len - self.fft_size) / self.hop + 1
        }
    }

    /// First sample of frame `index`
    pub fn frame_start(&self, index: usize) -> usize {
        index * self.hop
    }

    /// Iterate over the frames of `buffer`; frames never wrap or pad
    pub fn frames<'a>(&self, buffer: &'a [f64]) -> impl Iterator<Item = &'a [f64]> + 'a {
        buffer.windows(self.fft_size).step_by(self.hop)
    }
}
