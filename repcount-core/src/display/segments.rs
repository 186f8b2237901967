//! 7-segment encoding
//!
//! Bit layout: bit 0 = segment a, ... bit 6 = segment g. A set bit means the
//! segment is lit; electrical polarity is the driver's concern.
//!
//! ```text
//!    aaa
//!   f   b
//!    ggg
//!   e   c
//!    ddd
//! ```

/// Lit segments of one digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern(pub u8);

const DIGIT_PATTERNS: [u8; 10] = [
    0b011_1111, // 0: a b c d e f
    0b000_0110, // 1: b c
    0b101_1011, // 2: a b d e g
    0b100_1111, // 3: a b c d g
    0b110_0110, // 4: b c f g
    0b110_1101, // 5: a c d f g
    0b111_1101, // 6: a c d e f g
    0b000_0111, // 7: a b c
    0b111_1111, // 8: all
    0b110_1111, // 9: a b c d f g
];

impl SegmentPattern {
    /// Nothing lit
    pub const BLANK: SegmentPattern = SegmentPattern(0);

    /// Pattern for a decimal digit; values above 9 render blank
    pub fn digit(value: u8) -> Self {
        DIGIT_PATTERNS
            .get(value as usize)
            .map(|&bits| SegmentPattern(bits))
            .unwrap_or(Self::BLANK)
    }

    /// Check if segment `index` (0 = a .. 6 = g) is lit
    pub fn is_lit(&self, index: usize) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    /// Check if no segment is lit
    pub fn is_blank(&self) -> bool {
        self.0 & 0x7F == 0
    }
}
