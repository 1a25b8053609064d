//! vitals/waveform.rs
//!
//! Rolling window behind the ECG-style chart. Fixed length: every append
//! evicts the oldest point, so the chart scrolls one sample per tick.

use std::collections::VecDeque;

/// Fixed-length rolling buffer of waveform sample points.
///
/// Full from the moment it is constructed (seeded with the baseline value),
/// so consumers always see exactly the configured number of points.
#[derive(Clone, Debug)]
pub struct WaveformBuffer {
    points: VecDeque<f64>,
}

impl WaveformBuffer {
    pub fn new(capacity: usize, baseline: f64) -> Self {
        let mut points = VecDeque::with_capacity(capacity);
        points.extend(std::iter::repeat(baseline).take(capacity));
        Self { points }
    }

    /// Append a sample, evicting the oldest. Length never changes.
    pub fn push(&mut self, sample: f64) {
        self.points.pop_front();
        self.points.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.points.iter().copied().collect()
    }
}
