//! Events emitted by the repetition detector

use crate::Tick;

/// One counted repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepetitionEvent {
    /// Count after this repetition
    pub count: u8,
    /// Tick of the approach that was counted
    pub tick: Tick,
    /// Count was already at the display maximum and did not move
    pub saturated: bool,
}
