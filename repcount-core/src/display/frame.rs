//! Display frame
//!
//! A frame is four digit slots, each a value in 0..=9 or blank. It packs
//! into a `u32` so the refresh task can pick up a whole frame with one
//! atomic load.

use crate::display::segments::SegmentPattern;

/// Number of digit positions
pub const DIGIT_COUNT: usize = 4;

/// Packed nibble marking a blank slot
const BLANK_NIBBLE: u8 = 0x0F;

/// One complete display image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayFrame {
    digits: [u8; DIGIT_COUNT],
    blank: [bool; DIGIT_COUNT],
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::blank()
    }
}

impl DisplayFrame {
    /// All four positions blank
    pub const fn blank() -> Self {
        Self {
            digits: [0; DIGIT_COUNT],
            blank: [true; DIGIT_COUNT],
        }
    }

    /// Packed form of a blank frame, for static initializers
    pub const fn blank_bits() -> u32 {
        u32::from_ne_bytes([BLANK_NIBBLE; DIGIT_COUNT])
    }

    /// Two 2-digit values side by side, each clamped to 99
    ///
    /// With `leading_zeros` off, a zero tens digit is blanked.
    pub fn from_pairs(left: u16, right: u16, leading_zeros: bool) -> Self {
        let mut frame = Self::blank();
        frame.set_pair(0, left, leading_zeros);
        frame.set_pair(2, right, leading_zeros);
        frame
    }

    fn set_pair(&mut self, start: usize, value: u16, leading_zeros: bool) {
        let value = value.min(99) as u8;
        let tens = value / 10;
        let ones = value % 10;

        self.digits[start] = tens;
        self.blank[start] = tens == 0 && !leading_zeros;
        self.digits[start + 1] = ones;
        self.blank[start + 1] = false;
    }

    /// Digit at `position`, or `None` when blank
    pub fn digit(&self, position: usize) -> Option<u8> {
        match (self.digits.get(position), self.blank.get(position)) {
            (Some(&value), Some(false)) => Some(value),
            _ => None,
        }
    }

    /// Check if `position` is blank (out-of-range positions are blank)
    pub fn is_blank(&self, position: usize) -> bool {
        self.digit(position).is_none()
    }

    /// Segment pattern for `position`
    pub fn pattern(&self, position: usize) -> SegmentPattern {
        self.digit(position)
            .map(SegmentPattern::digit)
            .unwrap_or(SegmentPattern::BLANK)
    }

    /// Pack into one byte per digit, leftmost digit in the low byte
    pub fn to_bits(&self) -> u32 {
        let mut bits = 0u32;
        for position in 0..DIGIT_COUNT {
            let nibble = self.digit(position).unwrap_or(BLANK_NIBBLE);
            bits |= (nibble as u32) << (position * 8);
        }
        bits
    }

    /// Unpack a frame; any slot outside 0..=9 becomes blank
    pub fn from_bits(bits: u32) -> Self {
        let mut frame = Self::blank();
        for position in 0..DIGIT_COUNT {
            let value = ((bits >> (position * 8)) & 0xFF) as u8;
            if value <= 9 {
                frame.digits[position] = value;
                frame.blank[position] = false;
            }
        }
        frame
    }
}
