//! 4-digit 7-segment display
//!
//! Left pair shows the threshold, right pair shows the repetition count.
//! The sampling side renders a `DisplayFrame`; the refresh side only ever
//! reads frame snapshots and lights one digit per step.

pub mod controller;
pub mod frame;
pub mod segments;

pub use controller::{DisplayController, Multiplexer};
pub use frame::{DisplayFrame, DIGIT_COUNT};
pub use segments::SegmentPattern;
