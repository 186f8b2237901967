//! Configuration
//!
//! Type definitions plus the line-based parser for `counter.toml`.

pub mod parser;
pub mod types;

pub use parser::{parse_config, ParseError};
pub use types::*;
