//! Simple TOML parser for counter configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `counter.toml`. It does NOT support the full TOML format.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use crate::config::types::{CounterConfig, DisplayUnit};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header, a comment nor `key = value`
    InvalidKey,
    /// Value has the wrong type or is out of range for its field
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Loop,
    Sensor,
    Threshold,
    Detector,
    Button,
    Buzzer,
    Display,
}

/// Parse TOML configuration into CounterConfig
///
/// Keys missing from the input keep their defaults; unknown keys are
/// ignored so older images accept newer files.
pub fn parse_config(input: &str) -> Result<CounterConfig, ParseError> {
    let mut config = CounterConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidKey)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Parse a header line like `[sensor]`, tolerating a trailing comment
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?
        .trim();

    match name {
        "loop" => Ok(Section::Loop),
        "sensor" => Ok(Section::Sensor),
        "threshold" => Ok(Section::Threshold),
        "detector" => Ok(Section::Detector),
        "button" => Ok(Section::Button),
        "buzzer" => Ok(Section::Buzzer),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(hash_pos) if line[..hash_pos].matches('"').count() % 2 == 0 => {
            line[..hash_pos].trim()
        }
        _ => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_unit(value: &str) -> Result<DisplayUnit, ParseError> {
    match parse_string(value)? {
        "cm" => Ok(DisplayUnit::Centimeters),
        "in" => Ok(DisplayUnit::Inches),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut CounterConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {} // No top-level keys
        Section::Loop => {
            let c = &mut config.control;
            match key {
                "tick_ms" => c.tick_ms = parse_int(value)?,
                "sample_interval_ticks" => c.sample_interval_ticks = parse_int(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Sensor => {
            let s = &mut config.sensor;
            match key {
                "min_mm" => s.min_mm = parse_int(value)?,
                "max_mm" => s.max_mm = parse_int(value)?,
                "echo_timeout_us" => s.echo_timeout_us = parse_int(value)?,
                "filter_window" => s.filter_window = parse_int(value)?,
                _ => {}
            }
        }
        Section::Threshold => {
            let t = &mut config.threshold;
            match key {
                "min_mm" => t.min_mm = parse_int(value)?,
                "max_mm" => t.max_mm = parse_int(value)?,
                "deadband_mm" => t.deadband_mm = parse_int(value)?,
                "adc_max" => t.adc_max = parse_int(value)?,
                _ => {}
            }
        }
        Section::Detector => {
            if key == "hysteresis_mm" {
                config.detector.hysteresis_mm = parse_int(value)?;
            }
        }
        Section::Button => {
            let b = &mut config.button;
            match key {
                "debounce_ticks" => b.debounce_ticks = parse_int(value)?,
                "active_low" => b.active_low = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Buzzer => {
            let b = &mut config.buzzer;
            match key {
                "pulse_ms" => b.pulse_ms = parse_int(value)?,
                "frequency_hz" => b.frequency_hz = parse_int(value)?,
                _ => {}
            }
        }
        Section::Display => {
            let d = &mut config.display;
            match key {
                "digit_dwell_us" => d.digit_dwell_us = parse_int(value)?,
                "unit" => d.unit = parse_unit(value)?,
                "leading_zeros" => d.leading_zeros = parse_bool(value)?,
                "common_anode" => d.common_anode = parse_bool(value)?,
                _ => {}
            }
        }
    }

    Ok(())
}
