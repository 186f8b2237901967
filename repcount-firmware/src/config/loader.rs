//! Boot-time configuration loading
//!
//! Parses the embedded `counter.toml` and checks it. Any failure falls back
//! to the built-in defaults and logs why.

use defmt::*;

use repcount_core::config::{parse_config, CounterConfig};

/// Parse and validate `input`, falling back to defaults on any error
pub fn load_config(input: &str) -> CounterConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            return CounterConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            error!("Embedded config rejected: {:?}", e);
            warn!("Using default configuration");
            CounterConfig::default()
        }
    }
}
