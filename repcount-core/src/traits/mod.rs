//! Hardware abstraction traits
//!
//! These traits define the interface between the counter logic
//! and board-specific output drivers.

pub mod buzzer;
pub mod display;

pub use buzzer::BuzzerOutput;
pub use display::SegmentDisplay;
