//! Display drivers

pub mod seven_segment;

pub use seven_segment::{Polarity, SevenSegment};
