//! Board-agnostic core logic for the repetition counter firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Distance sampling and median filtering
//! - Potentiometer threshold mapping
//! - Hysteresis repetition detector
//! - Reset button debouncing
//! - Display rendering, multiplexing and buzzer pulse timing
//! - The fixed-tick control loop and its diagnostics
//! - Configuration type definitions
//! - Hardware abstraction traits (display, buzzer)

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod config;
pub mod control;
pub mod display;
pub mod input;
pub mod sensor;
pub mod state;
pub mod traits;

/// Monotonic control tick count
pub type Tick = u32;
