//! Fixed-tick controller
//!
//! One `tick` call runs every component once, in a fixed order:
//! sampling, threshold, detection, button, render, buzzer. All state is
//! owned here and each field has exactly one writer.

use crate::config::CounterConfig;
use crate::control::diagnostics::Diagnostics;
use crate::display::{DisplayController, DisplayFrame};
use crate::input::{ButtonDebouncer, PressEvent, Threshold, ThresholdSource};
use crate::sensor::{DistanceReading, DistanceSampler, EchoResult};
use crate::state::{RepetitionDetector, RepetitionEvent};
use crate::Tick;

/// Inputs gathered by the firmware for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInputs {
    /// Logical button level (true = pressed), polarity already applied
    pub button_pressed: bool,
    /// Raw potentiometer ADC reading, if one was taken this tick
    pub pot_raw: Option<u16>,
    /// Fresh ranging result, if one arrived since the last tick
    pub echo: Option<EchoResult>,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Tick number this report belongs to
    pub tick: Tick,
    /// Sampler output, when an echo was processed
    pub reading: Option<DistanceReading>,
    /// Newly applied threshold, when the knob moved past the deadband
    pub threshold_changed: Option<Threshold>,
    /// Counted repetition (suppressed by a same-tick reset)
    pub repetition: Option<RepetitionEvent>,
    /// Accepted reset press
    pub reset: Option<PressEvent>,
    /// Frame to show until the next tick
    pub frame: DisplayFrame,
    /// Buzzer level after this tick
    pub buzzer_on: bool,
}

/// Owned state of the whole counter
#[derive(Debug, Clone)]
pub struct ControlLoop {
    tick: Tick,
    sampler: DistanceSampler,
    threshold_source: ThresholdSource,
    threshold: Threshold,
    detector: RepetitionDetector,
    button: ButtonDebouncer,
    display: DisplayController,
    diagnostics: Diagnostics,
}

impl ControlLoop {
    /// Build the loop from a validated configuration
    ///
    /// Until the knob is first read, the threshold sits at the middle of
    /// its range.
    pub fn new(config: &CounterConfig) -> Self {
        let range = &config.threshold;
        let midpoint = range.min_mm + (range.max_mm.saturating_sub(range.min_mm)) / 2;
        let pulse_ticks = config.control.ms_to_ticks(config.buzzer.pulse_ms as u32);

        Self {
            tick: 0,
            sampler: DistanceSampler::new(&config.sensor),
            threshold_source: ThresholdSource::new(config.threshold),
            threshold: Threshold::from_mm(midpoint),
            detector: RepetitionDetector::new(config.detector.hysteresis_mm),
            button: ButtonDebouncer::new(config.button.debounce_ticks),
            display: DisplayController::new(&config.display, pulse_ticks),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run one control tick
    pub fn tick(&mut self, inputs: TickInputs) -> TickReport {
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        // Sampling
        let reading = inputs.echo.map(|echo| self.sampler.sample(echo, tick));
        if let Some(reading) = &reading {
            self.diagnostics.record_reading(reading);
        }

        // Threshold
        let threshold_changed = inputs.pot_raw.and_then(|raw| self.apply_threshold(raw));

        // Detection
        let threshold = self.threshold;
        let mut repetition = reading.and_then(|reading| self.detector.update(reading, threshold));

        // Button; a reset wins over a same-tick repetition
        let reset = self.button.update(inputs.button_pressed, tick);
        if reset.is_some() {
            self.detector.reset(tick);
            self.diagnostics.record_reset();
            repetition = None;
        }

        if let Some(event) = &repetition {
            self.diagnostics.record_repetition(event);
            self.display.pulse_buzzer();
        }

        // Render
        let frame = self.display.render(self.threshold, self.detector.count());

        // Buzzer
        let buzzer_on = self.display.buzzer_tick();

        TickReport {
            tick,
            reading,
            threshold_changed,
            repetition,
            reset,
            frame,
            buzzer_on,
        }
    }

    fn apply_threshold(&mut self, raw: u16) -> Option<Threshold> {
        let reading = self.threshold_source.update(raw);
        self.diagnostics.record_threshold(&reading);
        self.threshold = reading.threshold;
        reading.changed.then_some(reading.threshold)
    }

    /// Frame for the current state, without advancing the tick
    pub fn frame(&self) -> DisplayFrame {
        self.display.render(self.threshold, self.detector.count())
    }

    /// Repetitions since the last reset
    pub fn count(&self) -> u8 {
        self.detector.count()
    }

    /// Threshold in effect
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Number of ticks run so far
    pub fn ticks(&self) -> Tick {
        self.tick
    }

    /// Detector, for phase inspection
    pub fn detector(&self) -> &RepetitionDetector {
        &self.detector
    }

    /// Diagnostic counters
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{RangingError, SPEED_OF_SOUND_M_S};
    use crate::state::{Phase, MAX_COUNT};

    /// 300 mm threshold, 30 mm margin, no median smoothing
    fn config() -> CounterConfig {
        let mut config = CounterConfig::default();
        config.sensor.filter_window = 1;
        config
    }

    /// Pot reading that maps to 300 mm with the default range
    const POT_300MM: u16 = 1177;

    fn echo_for_mm(mm: u32) -> EchoResult {
        // Round up so the conversion lands back on `mm`
        Ok((mm * 2000).div_ceil(SPEED_OF_SOUND_M_S))
    }

    fn distance(mm: u32) -> TickInputs {
        TickInputs {
            echo: Some(echo_for_mm(mm)),
            ..TickInputs::default()
        }
    }

    fn primed() -> ControlLoop {
        let mut control = ControlLoop::new(&config());
        control.tick(TickInputs {
            pot_raw: Some(POT_300MM),
            ..TickInputs::default()
        });
        assert_eq!(control.threshold(), Threshold::from_mm(300));
        control
    }

    #[test]
    fn test_threshold_defaults_to_midpoint() {
        let control = ControlLoop::new(&CounterConfig::default());
        assert_eq!(control.threshold(), Threshold::from_mm(485));
    }

    #[test]
    fn test_threshold_change_reported_once() {
        let mut control = ControlLoop::new(&config());
        let first = control.tick(TickInputs {
            pot_raw: Some(POT_300MM),
            ..TickInputs::default()
        });
        assert_eq!(first.threshold_changed, Some(Threshold::from_mm(300)));

        let second = control.tick(TickInputs {
            pot_raw: Some(POT_300MM + 1),
            ..TickInputs::default()
        });
        assert_eq!(second.threshold_changed, None);
        assert_eq!(control.threshold(), Threshold::from_mm(300));
    }

    #[test]
    fn test_full_cycle_counts_and_beeps() {
        let mut control = primed();
        control.tick(distance(500));
        let report = control.tick(distance(250));

        let event = report.repetition.unwrap();
        assert_eq!(event.count, 1);
        assert!(report.buzzer_on);
        assert_eq!(report.frame, DisplayFrame::from_pairs(30, 1, true));

        control.tick(distance(500));
        assert_eq!(control.count(), 1);
        assert_eq!(control.detector().phase(), Phase::Far);
    }

    #[test]
    fn test_median_swallows_single_spike() {
        let mut control = ControlLoop::new(&CounterConfig::default());
        control.tick(TickInputs {
            pot_raw: Some(POT_300MM),
            ..TickInputs::default()
        });

        let spike = [500, 500, 250, 500, 500];
        let events = spike
            .iter()
            .filter_map(|&mm| control.tick(distance(mm)).repetition)
            .count();
        assert_eq!(events, 0);
        assert_eq!(control.detector().phase(), Phase::Far);

        // Two close samples outvote the window
        assert_eq!(control.tick(distance(250)).repetition, None);
        let report = control.tick(distance(250));
        assert_eq!(report.repetition.map(|e| e.count), Some(1));
        assert_eq!(control.count(), 1);
    }

    #[test]
    fn test_buzzer_pulse_length() {
        let mut control = primed();
        control.tick(distance(500));
        control.tick(distance(250));

        // 100 ms at 10 ms per tick; the crossing tick is the first
        let on_ticks = (0..20)
            .map(|_| control.tick(TickInputs::default()))
            .filter(|report| report.buzzer_on)
            .count();
        assert_eq!(on_ticks, 9);
    }

    #[test]
    fn test_reset_beats_same_tick_crossing() {
        let mut control = primed();
        control.tick(distance(500));
        control.tick(distance(250));
        control.tick(distance(500));
        assert_eq!(control.count(), 1);

        // Debounce needs 3 ticks; the press is accepted on the third
        control.tick(TickInputs {
            button_pressed: true,
            ..TickInputs::default()
        });
        control.tick(TickInputs {
            button_pressed: true,
            ..TickInputs::default()
        });
        let report = control.tick(TickInputs {
            button_pressed: true,
            echo: Some(echo_for_mm(250)),
            pot_raw: None,
        });

        assert!(report.reset.is_some());
        assert_eq!(report.repetition, None);
        assert_eq!(control.count(), 0);
        assert_eq!(control.detector().phase(), Phase::Far);
        assert_eq!(report.frame.digit(3), Some(0));
        assert_eq!(control.diagnostics().resets, 1);
    }

    #[test]
    fn test_sensor_errors_hold_state() {
        let mut control = primed();
        control.tick(distance(500));
        control.tick(distance(250));

        let report = control.tick(TickInputs {
            echo: Some(Err(RangingError::Timeout)),
            ..TickInputs::default()
        });
        assert!(report.reading.is_some());
        assert_eq!(report.repetition, None);
        assert_eq!(control.detector().phase(), Phase::Near);
        assert_eq!(control.count(), 1);
        assert_eq!(control.diagnostics().sensor_timeouts, 1);
    }

    #[test]
    fn test_ticks_without_echo_skip_detection() {
        let mut control = primed();
        let report = control.tick(TickInputs::default());
        assert_eq!(report.reading, None);
        assert_eq!(control.diagnostics().samples, 0);
        assert_eq!(control.ticks(), 2);
    }

    #[test]
    fn test_saturation_still_beeps() {
        let mut control = primed();
        for _ in 0..MAX_COUNT as usize + 2 {
            control.tick(distance(500));
            control.tick(distance(250));
        }
        assert_eq!(control.count(), MAX_COUNT);
        assert_eq!(control.diagnostics().saturated_repetitions, 2);

        control.tick(distance(500));
        let report = control.tick(distance(250));
        assert!(report.repetition.unwrap().saturated);
        assert!(report.buzzer_on);
        assert_eq!(report.frame.digit(2), Some(9));
        assert_eq!(report.frame.digit(3), Some(9));
    }
}
