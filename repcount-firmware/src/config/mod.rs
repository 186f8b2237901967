//! Configuration loading
//!
//! The counter's tuning is compiled in from `counter.toml` and parsed at
//! boot.

pub mod loader;

pub use loader::load_config;
