//! Moving-average smoothing for the sensor's noisy raw channels.
//!
//! The attitude sensor's analog channels are electrically noisy; averaging
//! over a short window trades a small latency penalty for materially
//! steadier display values. The window slides one sample at a time, it is
//! never reset, so once it fills every subsequent sample produces an
//! updated mean.

use std::collections::VecDeque;

/// Samples averaged per channel.
pub const WINDOW_SIZE: usize = 4;

/// Fixed-capacity sliding mean over raw samples.
///
/// `push` returns `None` until the window has filled, then the arithmetic
/// mean of the last [`WINDOW_SIZE`] samples for every sample after that.
#[derive(Debug, Clone, Default)]
pub struct MovingWindow {
    samples: VecDeque<f64>,
}

impl MovingWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_SIZE),
        }
    }

    /// Append a raw sample; emit the window mean once full.
    ///
    /// The oldest sample is dropped after the mean is taken, keeping the
    /// window sliding rather than resetting.
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        self.samples.push_back(sample);
        if self.samples.len() < WINDOW_SIZE {
            return None;
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.samples.pop_front();
        Some(mean)
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One smoothed value per sensor channel, if its window has filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothedSample {
    pub airspeed: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
    /// Averaged on the raw un-normalized heading stream; callers wrap to
    /// [0, 360) after any zero-reference math.
    pub heading: Option<f64>,
}

/// Independent sliding windows for the four smoothed sensor channels.
#[derive(Debug, Clone, Default)]
pub struct AttitudeFilter {
    airspeed: MovingWindow,
    pitch: MovingWindow,
    roll: MovingWindow,
    heading: MovingWindow,
}

impl AttitudeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw sample into each channel's window.
    pub fn push(&mut self, airspeed: f64, pitch: f64, roll: f64, heading: f64) -> SmoothedSample {
        SmoothedSample {
            airspeed: self.airspeed.push(airspeed),
            pitch: self.pitch.push(pitch),
            roll: self.roll.push(roll),
            heading: self.heading.push(heading),
        }
    }
}
