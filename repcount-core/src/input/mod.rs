//! Physical user inputs
//!
//! The potentiometer sets the threshold; the push button resets the count.

pub mod button;
pub mod threshold;

pub use button::{ButtonDebouncer, ButtonState, PressEvent};
pub use threshold::{Threshold, ThresholdReading, ThresholdSource};
