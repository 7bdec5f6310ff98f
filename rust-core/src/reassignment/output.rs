//! Output containers for reassigned points
//!
//! Three parallel row-major arrays (times, frequencies, magnitudes) shaped
//! frames x bins. Single-frame analysis uses one row.

use super::calculator::ReassignedPoint;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1};

/// Owner of the analysis output
#[derive(Debug, Clone)]
pub struct OutputStore {
    times: Array2<f64>,
    frequencies: Array2<f64>,
    magnitudes: Array2<f64>,
}

impl OutputStore {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            times: Array2::zeros((rows, cols)),
            frequencies: Array2::zeros((rows, cols)),
            magnitudes: Array2::zeros((rows, cols)),
        }
    }

    /// Make the store exactly `rows` x `cols`
    ///
    /// Unchanged shapes keep their allocation and contents. A new shape
    /// starts zeroed, so nothing from an older geometry survives.
    pub fn ensure_capacity(&mut self, rows: usize, cols: usize) {
        if self.shape() == (rows, cols) {
            return;
        }

        *self = Self::new(rows, cols);
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.times.dim()
    }

    /// Number of frames held
    pub fn rows(&self) -> usize {
        self.times.nrows()
    }

    /// Number of bins per frame
    pub fn cols(&self) -> usize {
        self.times.ncols()
    }

    pub fn times(&self) -> ArrayView2<'_, f64> {
        self.times.view()
    }

    pub fn frequencies(&self) -> ArrayView2<'_, f64> {
        self.frequencies.view()
    }

    pub fn magnitudes(&self) -> ArrayView2<'_, f64> {
        self.magnitudes.view()
    }

    /// Times, frequencies and magnitudes of one frame
    pub fn frame(&self, row: usize) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        (self.times.row(row), self.frequencies.row(row), self.magnitudes.row(row))
    }

    /// One reassigned point
    pub fn point(&self, row: usize, col: usize) -> ReassignedPoint {
        ReassignedPoint {
            time: self.times[[row, col]],
            frequency: self.frequencies[[row, col]],
            magnitude: self.magnitudes[[row, col]],
        }
    }

    /// Iterate over all points of one frame in bin order
    pub fn frame_points(&self, row: usize) -> impl Iterator<Item = ReassignedPoint> + '_ {
        let (times, frequencies, magnitudes) = self.frame(row);
        times
            .into_iter()
            .zip(frequencies)
            .zip(magnitudes)
            .map(|((&time, &frequency), &magnitude)| ReassignedPoint {
                time,
                frequency,
                magnitude,
            })
    }

    /// Writable view of one frame
    pub fn frame_mut(&mut self, row: usize) -> FrameOutputMut<'_> {
        FrameOutputMut {
            times: self.times.row_mut(row),
            frequencies: self.frequencies.row_mut(row),
            magnitudes: self.magnitudes.row_mut(row),
        }
    }

    /// Address of the first time value, for checking that storage was reused
    #[cfg(test)]
    pub(crate) fn storage_ptr(&self) -> *const f64 {
        self.times.as_ptr()
    }
}

/// Writable view of one output row
pub struct FrameOutputMut<'a> {
    times: ArrayViewMut1<'a, f64>,
    frequencies: ArrayViewMut1<'a, f64>,
    magnitudes: ArrayViewMut1<'a, f64>,
}

impl FrameOutputMut<'_> {
    /// Number of bins in the row
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn set(&mut self, bin: usize, point: ReassignedPoint) {
        self.times[bin] = point.time;
        self.frequencies[bin] = point.frequency;
        self.magnitudes[bin] = point.magnitude;
    }
}
