//! Distance sampling
//!
//! Turns raw ultrasonic echo timings into filtered distance readings.

pub mod filter;
pub mod sampler;

pub use filter::MedianFilter;
pub use sampler::{
    echo_to_mm, DistanceReading, DistanceSample, DistanceSampler, EchoResult, OutOfRangeReason,
    RangingError, SPEED_OF_SOUND_M_S,
};
