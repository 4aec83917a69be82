//! Build script for espmon-display-fw
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates display.toml at compile time

use std::fs;
use std::path::Path;

/// Keys accepted per section, with their expected types
const SESSION_KEYS: &[(&str, Kind)] = &[
    ("poll_interval_ms", Kind::Integer),
    ("link_timeout_ms", Kind::Integer),
    ("write_retries", Kind::Integer),
    ("write_retry_delay_ms", Kind::Integer),
    ("monochrome", Kind::Boolean),
    ("history", Kind::Boolean),
    ("placeholder", Kind::String),
];

const SERIAL_KEYS: &[(&str, Kind)] = &[("baudrate", Kind::Integer)];

/// Mirrors `SessionConfig::default()`
const DEFAULT_POLL_INTERVAL_MS: i64 = 100;
const DEFAULT_LINK_TIMEOUT_MS: i64 = 1000;

#[derive(Clone, Copy)]
enum Kind {
    Integer,
    Boolean,
    String,
}

impl Kind {
    fn matches(self, value: &toml::Value) -> bool {
        matches!(
            (self, value),
            (Kind::Integer, toml::Value::Integer(_))
                | (Kind::Boolean, toml::Value::Boolean(_))
                | (Kind::String, toml::Value::String(_))
        )
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Integer => "an integer",
            Kind::Boolean => "a boolean",
            Kind::String => "a string",
        }
    }
}

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    match config.as_table() {
        Some(root) => {
            for (name, section) in root {
                let keys = match name.as_str() {
                    "session" => SESSION_KEYS,
                    "serial" => SERIAL_KEYS,
                    _ => {
                        errors.push(format!("unknown section [{}]", name));
                        continue;
                    }
                };
                validate_section(name, section, keys, &mut errors);
            }
        }
        None => errors.push("top level must be a table".to_string()),
    }

    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display configuration                            ║\n\
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

    println!("cargo:warning=display.toml validated successfully");
}

fn validate_section(
    name: &str,
    section: &toml::Value,
    keys: &[(&str, Kind)],
    errors: &mut Vec<String>,
) {
    let Some(table) = section.as_table() else {
        errors.push(format!("[{}] must be a table", name));
        return;
    };

    for (key, value) in table {
        match keys.iter().find(|(k, _)| k == key) {
            Some((_, kind)) if !kind.matches(value) => {
                errors.push(format!("[{}] '{}' must be {}", name, key, kind.name()));
            }
            Some(_) => {}
            None => errors.push(format!("[{}] unknown key '{}'", name, key)),
        }
    }
}

fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let int = |section: &str, key: &str| {
        config
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_integer())
    };

    if let Some(baud) = int("serial", "baudrate") {
        if !(1200..=3_000_000).contains(&baud) {
            errors.push("[serial] baudrate must be 1200-3000000".to_string());
        }
    }
    for key in ["poll_interval_ms", "link_timeout_ms", "write_retries"] {
        if let Some(value) = int("session", key) {
            if value < 1 || value > i64::from(u32::MAX) {
                errors.push(format!("[session] {} must be 1-4294967295", key));
            }
        }
    }
    if let Some(value) = int("session", "write_retry_delay_ms") {
        if !(0..=i64::from(u32::MAX)).contains(&value) {
            errors.push("[session] write_retry_delay_ms must be 0-4294967295".to_string());
        }
    }

    // Unset keys fall back to the firmware defaults
    let poll = int("session", "poll_interval_ms").unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    let timeout = int("session", "link_timeout_ms").unwrap_or(DEFAULT_LINK_TIMEOUT_MS);
    if timeout < poll {
        errors.push("[session] link_timeout_ms must be >= poll_interval_ms".to_string());
    }
    let placeholder = config.get("session").and_then(|s| s.get("placeholder"));
    if let Some(toml::Value::String(text)) = placeholder {
        if text.len() > 8 {
            errors.push("[session] placeholder must be at most 8 bytes".to_string());
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
