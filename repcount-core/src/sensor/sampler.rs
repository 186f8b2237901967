//! Distance sampler
//!
//! Converts HC-SR04 echo pulse widths into millimeters, rejects readings the
//! sensor cannot resolve, and smooths the rest through a median filter.

use crate::config::SensorConfig;
use crate::sensor::filter::MedianFilter;
use crate::Tick;

/// Speed of sound at ~20°C in m/s (mm/ms)
pub const SPEED_OF_SOUND_M_S: u32 = 343;

/// Errors reported by a ranging driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingError {
    /// Echo line never went high after the trigger pulse
    NoEcho,
    /// Echo pulse did not end within the timeout (nothing in range)
    Timeout,
    /// GPIO access failed
    Pin,
}

/// Result of one ranging cycle: echo pulse width in microseconds
pub type EchoResult = Result<u32, RangingError>;

/// Why a reading carries no distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutOfRangeReason {
    /// No usable echo (timeout or pin fault)
    NoEcho,
    /// Closer than the sensor's blind zone
    TooClose,
    /// Farther than the sensor resolves
    TooFar,
}

/// A filtered distance measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceSample {
    /// Distance in millimeters
    pub mm: u16,
    /// Control tick the sample was taken on
    pub tick: Tick,
}

/// Output of the sampler for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceReading {
    /// Filtered distance
    Valid(DistanceSample),
    /// Nothing measurable this tick; never a threshold crossing
    OutOfRange(OutOfRangeReason),
}

impl DistanceReading {
    /// Distance in millimeters, if the reading is valid
    pub fn mm(&self) -> Option<u16> {
        match self {
            DistanceReading::Valid(sample) => Some(sample.mm),
            DistanceReading::OutOfRange(_) => None,
        }
    }

    /// Check if the reading carries a distance
    pub fn is_valid(&self) -> bool {
        matches!(self, DistanceReading::Valid(_))
    }
}

/// Convert a round-trip echo time to one-way distance in millimeters
///
/// mm = µs × 0.343 mm/µs / 2
pub fn echo_to_mm(echo_us: u32) -> u32 {
    (echo_us as u64 * SPEED_OF_SOUND_M_S as u64 / 2000) as u32
}

/// Distance sampler with range gating and median filtering
#[derive(Debug, Clone)]
pub struct DistanceSampler {
    filter: MedianFilter,
    min_mm: u16,
    max_mm: u16,
}

impl DistanceSampler {
    /// Create a sampler from the sensor configuration
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            filter: MedianFilter::new(config.filter_window as usize),
            min_mm: config.min_mm,
            max_mm: config.max_mm,
        }
    }

    /// Process one ranging result
    ///
    /// Out-of-range results bypass the filter so a burst of timeouts
    /// doesn't drag the median toward a bogus value.
    pub fn sample(&mut self, echo: EchoResult, tick: Tick) -> DistanceReading {
        let mm = match echo {
            Ok(echo_us) => echo_to_mm(echo_us),
            Err(_) => return DistanceReading::OutOfRange(OutOfRangeReason::NoEcho),
        };

        if mm < self.min_mm as u32 {
            return DistanceReading::OutOfRange(OutOfRangeReason::TooClose);
        }
        if mm > self.max_mm as u32 {
            return DistanceReading::OutOfRange(OutOfRangeReason::TooFar);
        }

        let filtered = self.filter.push(mm as u16);
        DistanceReading::Valid(DistanceSample { mm: filtered, tick })
    }

    /// Latest filtered distance without taking a new sample
    pub fn last_mm(&self) -> Option<u16> {
        self.filter.median()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(window: u8) -> DistanceSampler {
        DistanceSampler::new(&SensorConfig {
            filter_window: window,
            ..SensorConfig::default()
        })
    }

    /// Echo time for a given distance (inverse of echo_to_mm)
    fn echo_for_mm(mm: u32) -> u32 {
        mm * 2000 / SPEED_OF_SOUND_M_S
    }

    #[test]
    fn test_echo_conversion() {
        // 1 m round trip takes ~5831 µs
        assert_eq!(echo_to_mm(5831), 1000);
        assert_eq!(echo_to_mm(0), 0);
        // 58 µs per cm rule of thumb
        assert_eq!(echo_to_mm(583), 99);
    }

    #[test]
    fn test_valid_reading() {
        let mut s = sampler(1);
        let reading = s.sample(Ok(echo_for_mm(300)), 7);
        match reading {
            DistanceReading::Valid(sample) => {
                assert!((sample.mm as i32 - 300).abs() <= 1);
                assert_eq!(sample.tick, 7);
            }
            DistanceReading::OutOfRange(_) => panic!("expected valid reading"),
        }
    }

    #[test]
    fn test_timeout_is_out_of_range() {
        let mut s = sampler(3);
        assert_eq!(
            s.sample(Err(RangingError::Timeout), 0),
            DistanceReading::OutOfRange(OutOfRangeReason::NoEcho)
        );
        assert_eq!(s.last_mm(), None);
    }

    #[test]
    fn test_too_close_and_too_far() {
        let mut s = sampler(3);
        assert_eq!(
            s.sample(Ok(echo_for_mm(10)), 0),
            DistanceReading::OutOfRange(OutOfRangeReason::TooClose)
        );
        assert_eq!(
            s.sample(Ok(echo_for_mm(4500)), 1),
            DistanceReading::OutOfRange(OutOfRangeReason::TooFar)
        );
    }

    #[test]
    fn test_out_of_range_does_not_enter_filter() {
        let mut s = sampler(3);
        s.sample(Ok(echo_for_mm(500)), 0);
        s.sample(Err(RangingError::NoEcho), 1);
        s.sample(Ok(echo_for_mm(10)), 2);
        let reading = s.sample(Ok(echo_for_mm(500)), 3);
        let mm = reading.mm().unwrap();
        assert!((mm as i32 - 500).abs() <= 1);
    }

    #[test]
    fn test_spike_filtered() {
        let mut s = sampler(3);
        s.sample(Ok(echo_for_mm(800)), 0);
        s.sample(Ok(echo_for_mm(800)), 1);
        let spiked = s.sample(Ok(echo_for_mm(100)), 2).mm().unwrap();
        assert!(spiked > 700);
    }
}
