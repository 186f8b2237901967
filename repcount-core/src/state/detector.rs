//! Repetition detector
//!
//! Owns the repetition count. Feeds each filtered distance through the
//! phase machine and counts approaches.

use crate::input::Threshold;
use crate::sensor::DistanceReading;
use crate::state::events::RepetitionEvent;
use crate::state::machine::{Crossing, Phase};
use crate::Tick;

/// Highest count the two count digits can show
pub const MAX_COUNT: u8 = 99;

/// Detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepetitionState {
    /// Current phase
    pub phase: Phase,
    /// Repetitions since the last reset, saturating at MAX_COUNT
    pub count: u8,
    /// Tick of the last phase change or reset
    pub last_transition_tick: Tick,
}

/// Hysteresis repetition detector
#[derive(Debug, Clone)]
pub struct RepetitionDetector {
    state: RepetitionState,
    hysteresis_mm: u16,
}

impl RepetitionDetector {
    /// Create a detector in `Far` with a zero count
    pub fn new(hysteresis_mm: u16) -> Self {
        Self {
            state: RepetitionState::default(),
            hysteresis_mm,
        }
    }

    /// Process one reading against the current threshold
    ///
    /// Out-of-range readings leave the state untouched.
    pub fn update(
        &mut self,
        reading: DistanceReading,
        threshold: Threshold,
    ) -> Option<RepetitionEvent> {
        let sample = match reading {
            DistanceReading::Valid(sample) => sample,
            DistanceReading::OutOfRange(_) => return None,
        };

        let (next, crossing) = self
            .state
            .phase
            .transition(sample.mm, threshold, self.hysteresis_mm);

        if next != self.state.phase {
            self.state.phase = next;
            self.state.last_transition_tick = sample.tick;
        }

        match crossing {
            Some(Crossing::Approach) => {
                let saturated = self.state.count >= MAX_COUNT;
                if !saturated {
                    self.state.count += 1;
                }
                Some(RepetitionEvent {
                    count: self.state.count,
                    tick: sample.tick,
                    saturated,
                })
            }
            Some(Crossing::Retreat) | None => None,
        }
    }

    /// Zero the count and re-arm in `Far`
    pub fn reset(&mut self, tick: Tick) {
        self.state = RepetitionState {
            phase: Phase::Far,
            count: 0,
            last_transition_tick: tick,
        };
    }

    /// Repetitions since the last reset
    pub fn count(&self) -> u8 {
        self.state.count
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Snapshot of the detector state
    pub fn state(&self) -> RepetitionState {
        self.state
    }

    /// Configured hysteresis margin
    pub fn hysteresis_mm(&self) -> u16 {
        self.hysteresis_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{DistanceSample, OutOfRangeReason};

    const THRESHOLD: Threshold = Threshold::from_cm(30);

    fn valid(cm: u16, tick: Tick) -> DistanceReading {
        DistanceReading::Valid(DistanceSample { mm: cm * 10, tick })
    }

    /// Run a sequence of centimeter readings (ticks 1..) and count events
    fn run(detector: &mut RepetitionDetector, cms: &[u16]) -> usize {
        cms.iter()
            .enumerate()
            .filter_map(|(i, &cm)| detector.update(valid(cm, i as Tick + 1), THRESHOLD))
            .count()
    }

    #[test]
    fn test_single_cycle_counts_once() {
        // 20 mm margin puts the near edge at 28 cm
        let mut detector = RepetitionDetector::new(20);
        let mut events = [None; 6];
        for (i, cm) in [50, 50, 28, 28, 50, 50].into_iter().enumerate() {
            events[i] = detector.update(valid(cm, i as Tick + 1), THRESHOLD);
        }
        assert_eq!(
            events[2],
            Some(RepetitionEvent {
                count: 1,
                tick: 3,
                saturated: false
            })
        );
        assert_eq!(events.iter().filter(|e| e.is_some()).count(), 1);
        assert_eq!(detector.count(), 1);
        assert_eq!(detector.phase(), Phase::Far);
    }

    #[test]
    fn test_near_edge_is_threshold_minus_margin() {
        let mut detector = RepetitionDetector::new(30);
        assert_eq!(run(&mut detector, &[50, 50, 28, 28, 50, 50]), 0);
        assert_eq!(detector.phase(), Phase::Far);

        // 27 cm sits exactly on the edge and crosses
        assert_eq!(run(&mut detector, &[50, 27, 50]), 1);
        assert_eq!(detector.count(), 1);
        assert_eq!(detector.phase(), Phase::Far);
    }

    #[test]
    fn test_oscillation_inside_band_not_counted() {
        let mut detector = RepetitionDetector::new(30);
        // 29 and 28 sit inside the band, 31 never clears it
        assert_eq!(run(&mut detector, &[50, 29, 31, 28, 50]), 0);
        assert_eq!(detector.count(), 0);

        // A real dip below 27 and back above 33 counts once
        assert_eq!(run(&mut detector, &[26, 29, 31, 28, 34]), 1);
        assert_eq!(detector.count(), 1);
    }

    #[test]
    fn test_jitter_while_near_counts_once() {
        let mut detector = RepetitionDetector::new(30);
        assert_eq!(run(&mut detector, &[20, 29, 25, 32, 26, 29, 20]), 1);
        assert_eq!(detector.phase(), Phase::Near);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut detector = RepetitionDetector::new(30);
        detector.update(valid(20, 1), THRESHOLD);
        let before = detector.state();
        for reason in [
            OutOfRangeReason::NoEcho,
            OutOfRangeReason::TooClose,
            OutOfRangeReason::TooFar,
        ] {
            assert_eq!(
                detector.update(DistanceReading::OutOfRange(reason), THRESHOLD),
                None
            );
        }
        assert_eq!(detector.state(), before);
    }

    #[test]
    fn test_reset_from_near() {
        let mut detector = RepetitionDetector::new(30);
        run(&mut detector, &[50, 20]);
        assert_eq!(detector.phase(), Phase::Near);

        detector.reset(9);
        assert_eq!(detector.count(), 0);
        assert_eq!(detector.phase(), Phase::Far);
        assert_eq!(detector.state().last_transition_tick, 9);

        // Forced back to Far, so the next close sample counts
        assert_eq!(run(&mut detector, &[20, 20]), 1);
    }

    #[test]
    fn test_count_saturates() {
        let mut detector = RepetitionDetector::new(30);
        for _ in 0..MAX_COUNT {
            run(&mut detector, &[20, 50]);
        }
        assert_eq!(detector.count(), MAX_COUNT);

        let event = detector.update(valid(20, 500), THRESHOLD).unwrap();
        assert!(event.saturated);
        assert_eq!(event.count, MAX_COUNT);
        assert_eq!(detector.count(), MAX_COUNT);
    }

    #[test]
    fn test_transition_tick_recorded() {
        let mut detector = RepetitionDetector::new(30);
        run(&mut detector, &[50, 50, 20]);
        assert_eq!(detector.state().last_transition_tick, 3);
    }
}
