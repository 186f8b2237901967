//! Multiplexed 7-segment display trait

use crate::display::SegmentPattern;

/// Trait for a multiplexed 7-segment module
///
/// The module shares segment lines across all digits, so only one digit is
/// lit at any moment. The multiplexer calls `all_off` before lighting the
/// next digit to avoid ghosting.
pub trait SegmentDisplay {
    /// Number of digit positions on the module
    const DIGITS: usize;

    /// Turn off every digit select and every segment
    fn all_off(&mut self);

    /// Light a single digit with the given segment pattern
    ///
    /// `position` counts from the leftmost digit (0).
    fn light(&mut self, position: usize, pattern: SegmentPattern);
}
