//! Control loop
//!
//! Ties the sampler, threshold source, detector, debouncer and display
//! together on one fixed-rate tick.

pub mod controller;
pub mod diagnostics;

pub use controller::{ControlLoop, TickInputs, TickReport};
pub use diagnostics::Diagnostics;
