//! Minimal TOML loader for session configuration
//!
//! Handles only the subset board files use. It does NOT support full
//! TOML syntax.
//!
//! Supported:
//! - `[session]` and `[serial]` section headers
//! - Key = value pairs (string, integer, boolean)
//! - Comments (# ...), including trailing ones
//!
//! Keys not set keep their defaults.

use super::types::{ConfigError, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Session,
    Serial,
}

/// Parse TOML text into a validated [`SessionConfig`]
pub fn parse_session_config(input: &str) -> Result<SessionConfig, ConfigError> {
    let mut config = SessionConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ConfigError::InvalidSection);
            }
            section = match header[1..header.len() - 1].trim() {
                "session" => Section::Session,
                "serial" => Section::Serial,
                _ => return Err(ConfigError::InvalidSection),
            };
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::Syntax)?;
        match section {
            Section::Root => return Err(ConfigError::UnknownKey),
            Section::Session => apply_session_key(&mut config, key, value)?,
            Section::Serial => match key {
                "baudrate" => config.baudrate = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            },
        }
    }

    config.validate()?;
    Ok(config)
}

fn apply_session_key(
    config: &mut SessionConfig,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "poll_interval_ms" => config.poll_interval_ms = parse_int(value)?,
        "link_timeout_ms" => config.link_timeout_ms = parse_int(value)?,
        "write_retries" => config.write_retries = parse_int(value)?,
        "write_retry_delay_ms" => config.write_retry_delay_ms = parse_int(value)?,
        "monochrome" => config.monochrome = parse_bool(value)?,
        "history" => config.history = parse_bool(value)?,
        "placeholder" => {
            config.placeholder.clear();
            config
                .placeholder
                .push_str(parse_string(value)?)
                .map_err(|_| ConfigError::InvalidValue)?;
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) if text[..pos].matches('"').count() % 2 == 0 => text[..pos].trim(),
        _ => text,
    }
}

/// Split a `key = value` line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ConfigError::InvalidValue)
    }
}

/// Parse an integer value; `_` separators are allowed
fn parse_int(value: &str) -> Result<u32, ConfigError> {
    let mut result: u32 = 0;
    let mut digits = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ConfigError::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ConfigError::InvalidValue)?;
        digits += 1;
    }
    if digits == 0 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(result)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_session_config(""), Ok(SessionConfig::default()));
    }

    #[test]
    fn test_full_file() {
        let input = r#"
# Bench display
[serial]
baudrate = 115_200

[session]
poll_interval_ms = 50   # faster polling
link_timeout_ms = 2000
monochrome = true
history = false
placeholder = "--#--"
"#;
        let config = parse_session_config(input).unwrap();
        assert_eq!(config.baudrate, 115_200);
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.link_timeout_ms, 2000);
        assert!(config.monochrome);
        assert!(!config.history);
        assert_eq!(config.placeholder.as_str(), "--#--");
        assert_eq!(config.write_retries, 1000);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_session_config("[motor]\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        let err = Err(ConfigError::UnknownKey);
        assert_eq!(parse_session_config("[session]\nspeed = 3\n"), err);
        assert_eq!(parse_session_config("history = true\n"), err);
    }

    #[test]
    fn test_bad_values() {
        for line in [
            "history = yes",
            "poll_interval_ms = -5",
            "placeholder = ---",
            "placeholder = \"way too long\"",
            "poll_interval_ms = 0",
        ] {
            let mut input: heapless::String<64> = heapless::String::new();
            input.push_str("[session]\n").unwrap();
            input.push_str(line).unwrap();
            assert_eq!(parse_session_config(&input), Err(ConfigError::InvalidValue), "{}", line);
        }
    }

    #[test]
    fn test_timeout_and_delay_rules() {
        let short_timeout = "[session]\npoll_interval_ms = 500\nlink_timeout_ms = 200\n";
        assert_eq!(parse_session_config(short_timeout), Err(ConfigError::InvalidValue));
        let negative_delay = "[session]\nwrite_retry_delay_ms = -1\n";
        assert_eq!(parse_session_config(negative_delay), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_board_file_accepted() {
        let board = include_str!("../../../displays/espmon-display-fw/display.toml");
        let config = parse_session_config(board).unwrap();
        assert!(config.monochrome);
        assert_eq!(config.baudrate, 115_200);
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(parse_session_config("[session]\nhistory\n"), Err(ConfigError::Syntax));
    }

    #[test]
    fn test_int_parsing() {
        assert_eq!(parse_int("1_000"), Ok(1000));
        assert_eq!(parse_int("_"), Err(ConfigError::InvalidValue));
        assert_eq!(parse_int("99999999999"), Err(ConfigError::InvalidValue));
    }
}
