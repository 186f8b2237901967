//! Repetition state machine
//!
//! The approach/retreat cycle is an explicit two-state machine with
//! hysteresis guards. One full Far → Near → Far cycle is one repetition.

pub mod detector;
pub mod events;
pub mod machine;

pub use detector::{RepetitionDetector, RepetitionState, MAX_COUNT};
pub use events::RepetitionEvent;
pub use machine::{Crossing, Phase};
