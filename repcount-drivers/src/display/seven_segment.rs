//! Multiplexed 4-digit 7-segment display over GPIO
//!
//! Seven shared segment lines (a..g) and four digit-select lines. The
//! driver only translates lit/unlit into pin levels; timing belongs to the
//! caller's multiplexer.

use embedded_hal::digital::OutputPin;
use repcount_core::display::{SegmentPattern, DIGIT_COUNT};
use repcount_core::traits::SegmentDisplay;

/// Number of segment lines (decimal point unused)
pub const SEGMENT_COUNT: usize = 7;

/// Electrical polarity of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Segments active-low, digit selects active-high
    CommonAnode,
    /// Segments active-high, digit selects active-low
    CommonCathode,
}

impl Polarity {
    /// Polarity from the `common_anode` configuration flag
    pub fn from_common_anode(common_anode: bool) -> Self {
        if common_anode {
            Polarity::CommonAnode
        } else {
            Polarity::CommonCathode
        }
    }

    fn segment_active_high(self) -> bool {
        matches!(self, Polarity::CommonCathode)
    }

    fn digit_active_high(self) -> bool {
        matches!(self, Polarity::CommonAnode)
    }
}

/// Drive `pin` to its active or inactive level
///
/// Pin errors are dropped: a missed refresh step is corrected on the next.
fn drive<P: OutputPin>(pin: &mut P, active: bool, active_high: bool) {
    let _ = if active == active_high {
        pin.set_high()
    } else {
        pin.set_low()
    };
}

/// GPIO 7-segment display
pub struct SevenSegment<S, D> {
    segments: [S; SEGMENT_COUNT],
    digits: [D; DIGIT_COUNT],
    polarity: Polarity,
}

impl<S: OutputPin, D: OutputPin> SevenSegment<S, D> {
    /// Create a display driver and blank the module
    ///
    /// `segments` are ordered a..g, `digits` left to right.
    pub fn new(
        segments: [S; SEGMENT_COUNT],
        digits: [D; DIGIT_COUNT],
        polarity: Polarity,
    ) -> Self {
        let mut display = Self {
            segments,
            digits,
            polarity,
        };
        display.all_off();
        display
    }

    /// Configured polarity
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

impl<S: OutputPin, D: OutputPin> SegmentDisplay for SevenSegment<S, D> {
    const DIGITS: usize = DIGIT_COUNT;

    fn all_off(&mut self) {
        let digit_high = self.polarity.digit_active_high();
        for pin in self.digits.iter_mut() {
            drive(pin, false, digit_high);
        }
        let segment_high = self.polarity.segment_active_high();
        for pin in self.segments.iter_mut() {
            drive(pin, false, segment_high);
        }
    }

    fn light(&mut self, position: usize, pattern: SegmentPattern) {
        let Some(select) = self.digits.get_mut(position) else {
            return;
        };

        // Segments first so the digit never shows the previous pattern
        let segment_high = self.polarity.segment_active_high();
        for (index, pin) in self.segments.iter_mut().enumerate() {
            drive(pin, pattern.is_lit(index), segment_high);
        }
        drive(select, true, self.polarity.digit_active_high());
    }
}
