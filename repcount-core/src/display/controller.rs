//! Display controller
//!
//! Renders the threshold and count into a frame, multiplexes frames onto
//! the module one digit per step, and times the repetition beep.

use crate::buzzer::BuzzerPulse;
use crate::config::{DisplayConfig, DisplayUnit};
use crate::display::frame::{DisplayFrame, DIGIT_COUNT};
use crate::display::segments::SegmentPattern;
use crate::input::Threshold;
use crate::traits::SegmentDisplay;

/// Round-robin digit multiplexer
///
/// Each `refresh` call turns everything off, then lights the next digit.
/// Calling it every dwell period gives a full frame every four periods.
#[derive(Debug, Clone, Default)]
pub struct Multiplexer {
    position: usize,
}

impl Multiplexer {
    /// Create a multiplexer starting at the leftmost digit
    pub fn new() -> Self {
        Self { position: 0 }
    }

    /// Digit that the next step lights
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance one step and return the digit and pattern to light
    pub fn step(&mut self, frame: &DisplayFrame) -> (usize, SegmentPattern) {
        let position = self.position;
        self.position = (self.position + 1) % DIGIT_COUNT;
        (position, frame.pattern(position))
    }

    /// Drive one multiplex step on the module
    ///
    /// Blank digits leave the module dark for their slot so every digit
    /// keeps the same duty cycle and brightness.
    pub fn refresh<D: SegmentDisplay>(&mut self, frame: &DisplayFrame, display: &mut D) {
        let (position, pattern) = self.step(frame);
        display.all_off();
        if !pattern.is_blank() && position < D::DIGITS {
            display.light(position, pattern);
        }
    }
}

/// Display and buzzer front end
#[derive(Debug, Clone)]
pub struct DisplayController {
    unit: DisplayUnit,
    leading_zeros: bool,
    mux: Multiplexer,
    buzzer: BuzzerPulse,
}

impl DisplayController {
    /// Create a controller; `pulse_ticks` is the beep length in control ticks
    pub fn new(config: &DisplayConfig, pulse_ticks: u32) -> Self {
        Self {
            unit: config.unit,
            leading_zeros: config.leading_zeros,
            mux: Multiplexer::new(),
            buzzer: BuzzerPulse::new(pulse_ticks),
        }
    }

    /// Build the frame: threshold on the left pair, count on the right
    pub fn render(&self, threshold: Threshold, count: u8) -> DisplayFrame {
        DisplayFrame::from_pairs(threshold.in_units(self.unit), count as u16, self.leading_zeros)
    }

    /// Drive one multiplex step of `frame`
    pub fn refresh<D: SegmentDisplay>(&mut self, frame: &DisplayFrame, display: &mut D) {
        self.mux.refresh(frame, display);
    }

    /// Start (or restart) the repetition beep
    pub fn pulse_buzzer(&mut self) {
        self.buzzer.trigger();
    }

    /// Advance the beep timer by one tick; returns whether the buzzer is on
    pub fn buzzer_tick(&mut self) -> bool {
        self.buzzer.tick()
    }

    /// Unit used for the threshold digits
    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }
}
