//! Build script for repcount-firmware
//!
//! - Sets up linker search paths for memory.x and the linker scripts
//! - Validates counter.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known sections and their keys
const SCHEMA: &[(&str, &[&str])] = &[
    ("loop", &["tick_ms", "sample_interval_ticks"]),
    ("sensor", &["min_mm", "max_mm", "echo_timeout_us", "filter_window"]),
    ("threshold", &["min_mm", "max_mm", "deadband_mm", "adc_max"]),
    ("detector", &["hysteresis_mm"]),
    ("button", &["debounce_ticks", "active_low"]),
    ("buzzer", &["pulse_ms", "frequency_hz"]),
    ("display", &["digit_dwell_us", "unit", "leading_zeros", "common_anode"]),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate counter.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=counter.toml");

    let config_path = Path::new("counter.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: counter.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds counter.toml at compile time.               ║\n\
            ║  Please create one in the repcount-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read counter.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in counter.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_schema(&config, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid counter configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=counter.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections, and only scalar values the firmware parser reads
fn validate_schema(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = SCHEMA.iter().find(|(s, _)| *s == name.as_str()) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in table {
            if !keys.contains(&key.as_str()) {
                println!("cargo:warning=counter.toml: [{}] {} is ignored", name, key);
            }
            if matches!(
                value,
                toml::Value::Array(_) | toml::Value::Table(_) | toml::Value::Float(_)
            ) {
                errors.push(format!("[{}] {} must be an integer, bool or string", name, key));
            }
        }
    }
}

fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Range checks mirroring `CounterConfig::validate`
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let get = |section, key, default| int(config, section, key).unwrap_or(default);

    let tick_ms = get("loop", "tick_ms", 10);
    let interval = get("loop", "sample_interval_ticks", 4);
    if tick_ms <= 0 || interval <= 0 {
        errors.push("[loop] tick_ms and sample_interval_ticks must be > 0".into());
    } else if tick_ms * interval < 20 {
        errors.push("[loop] ranging period must be at least 20 ms".into());
    }

    let sensor_min = get("sensor", "min_mm", 20);
    let sensor_max = get("sensor", "max_mm", 4000);
    if sensor_min >= sensor_max {
        errors.push("[sensor] min_mm must be below max_mm".into());
    }
    let window = get("sensor", "filter_window", 3);
    if !(1..=5).contains(&window) {
        errors.push("[sensor] filter_window must be 1-5".into());
    }

    let threshold_min = get("threshold", "min_mm", 50);
    let threshold_max = get("threshold", "max_mm", 920);
    if threshold_min >= threshold_max || threshold_min < sensor_min || threshold_max > sensor_max
    {
        errors.push("[threshold] range must be non-empty and inside the sensor range".into());
    }

    let hysteresis = get("detector", "hysteresis_mm", 30);
    if hysteresis < 5 || hysteresis * 2 >= threshold_max - threshold_min {
        errors.push("[detector] hysteresis_mm must be >= 5 and < half the range".into());
    }

    if get("button", "debounce_ticks", 3) <= 0 {
        errors.push("[button] debounce_ticks must be > 0".into());
    }

    let dwell = get("display", "digit_dwell_us", 2000);
    if dwell <= 0 || 1_000_000 / (dwell * 4) < 60 {
        errors.push("[display] digit_dwell_us too long for a 60 Hz frame".into());
    }

    if let Some(unit) = config.get("display").and_then(|d| d.get("unit")) {
        if !matches!(unit.as_str(), Some("cm") | Some("in")) {
            errors.push("[display] unit must be \"cm\" or \"in\"".into());
        }
    }
}
