//! Runtime diagnostics
//!
//! Counts the conditions the loop absorbs instead of failing on: missed
//! echoes, readings outside the sensor range, clamped knob readings and
//! repetitions past the display maximum. Nothing here is ever fatal.

use crate::input::ThresholdReading;
use crate::sensor::{DistanceReading, OutOfRangeReason};
use crate::state::RepetitionEvent;

/// Saturating event counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// Ranging results processed
    pub samples: u32,
    /// Ranging cycles with no usable echo
    pub sensor_timeouts: u32,
    /// Echoes outside the sensor's measurable range
    pub out_of_range: u32,
    /// Potentiometer readings above ADC full scale
    pub clamped_inputs: u32,
    /// Repetitions detected while the count was already at its maximum
    pub saturated_repetitions: u32,
    /// Accepted reset presses
    pub resets: u32,
}

impl Diagnostics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sampler output
    pub fn record_reading(&mut self, reading: &DistanceReading) {
        self.samples = self.samples.saturating_add(1);
        match reading {
            DistanceReading::Valid(_) => {}
            DistanceReading::OutOfRange(OutOfRangeReason::NoEcho) => {
                self.sensor_timeouts = self.sensor_timeouts.saturating_add(1);
            }
            DistanceReading::OutOfRange(_) => {
                self.out_of_range = self.out_of_range.saturating_add(1);
            }
        }
    }

    /// Record one potentiometer read
    pub fn record_threshold(&mut self, reading: &ThresholdReading) {
        if reading.clamped {
            self.clamped_inputs = self.clamped_inputs.saturating_add(1);
        }
    }

    /// Record a detected repetition
    pub fn record_repetition(&mut self, event: &RepetitionEvent) {
        if event.saturated {
            self.saturated_repetitions = self.saturated_repetitions.saturating_add(1);
        }
    }

    /// Record an accepted reset
    pub fn record_reset(&mut self) {
        self.resets = self.resets.saturating_add(1);
    }

    /// Fraction of samples without a usable distance, in percent
    pub fn miss_rate_percent(&self) -> u32 {
        if self.samples == 0 {
            return 0;
        }
        let missed = self.sensor_timeouts as u64 + self.out_of_range as u64;
        (missed * 100 / self.samples as u64) as u32
    }
}
