//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in repcount-core, written against `embedded-hal` 1.0:
//!
//! - Ultrasonic ranging (HC-SR04)
//! - Multiplexed 4-digit 7-segment display
//! - PWM tone buzzer

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod display;
pub mod sensor;
