//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod control;
pub mod display;
pub mod ranging;

pub use control::{control_task, ControlPeripherals};
pub use display::{display_task, Display};
pub use ranging::{ranging_task, InstantClock, Sensor};
