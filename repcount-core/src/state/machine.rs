//! Phase definition
//!
//! Phase changes are a pure function of the current phase, one distance
//! and the hysteresis band around the threshold.

use crate::input::Threshold;

/// Where the user is relative to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Beyond the threshold; armed for the next approach
    #[default]
    Far,
    /// Inside the threshold; this approach has been counted
    Near,
}

/// Edge produced by a phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Crossing {
    /// Far → Near: counts a repetition
    Approach,
    /// Near → Far: re-arms the detector
    Retreat,
}

impl Phase {
    /// Process one distance and return the next phase with the edge taken
    ///
    /// Enter `Near` at or below `threshold - margin`, return to `Far` at or
    /// above `threshold + margin`. Anything in between holds the phase.
    pub fn transition(
        self,
        distance_mm: u16,
        threshold: Threshold,
        margin_mm: u16,
    ) -> (Self, Option<Crossing>) {
        match self {
            Phase::Far => {
                // A threshold inside the margin can never be approached
                match threshold.mm.checked_sub(margin_mm) {
                    Some(near_edge) if distance_mm <= near_edge => {
                        (Phase::Near, Some(Crossing::Approach))
                    }
                    _ => (Phase::Far, None),
                }
            }
            Phase::Near => {
                let far_edge = threshold.mm.saturating_add(margin_mm);
                if distance_mm >= far_edge {
                    (Phase::Far, Some(Crossing::Retreat))
                } else {
                    (Phase::Near, None)
                }
            }
        }
    }
}
