//! Configuration type definitions

use heapless::String;

use espmon_protocol::RetryPolicy;

use crate::link::LINK_TIMEOUT_MS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interval between poll requests
pub const POLL_INTERVAL_MS: u32 = 100;

/// Maximum placeholder text length
pub const MAX_PLACEHOLDER_LEN: usize = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Line is neither a header nor `key = value`
    Syntax,
}

/// Session tunables
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// UART baud rate
    pub baudrate: u32,
    /// Time between poll requests (ms)
    pub poll_interval_ms: u32,
    /// Silence before the link counts as lost (ms)
    pub link_timeout_ms: u32,
    /// Write attempts per request
    pub write_retries: u32,
    /// Pause between write attempts (ms)
    pub write_retry_delay_ms: u32,
    /// Panel has one bit per pixel; gradients are disabled
    pub monochrome: bool,
    /// Record the averaged history graph
    pub history: bool,
    /// Value text shown while there is no data
    pub placeholder: String<MAX_PLACEHOLDER_LEN>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mut placeholder = String::new();
        let _ = placeholder.push_str("---");
        Self {
            baudrate: 115_200,
            poll_interval_ms: POLL_INTERVAL_MS,
            link_timeout_ms: LINK_TIMEOUT_MS,
            write_retries: 1000,
            write_retry_delay_ms: 5,
            monochrome: false,
            history: true,
            placeholder,
        }
    }
}

impl SessionConfig {
    /// Write retry policy for the serial link
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.write_retries,
            delay_ms: self.write_retry_delay_ms,
        }
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baudrate == 0
            || self.poll_interval_ms == 0
            || self.link_timeout_ms < self.poll_interval_ms
            || self.write_retries == 0
        {
            return Err(ConfigError::InvalidValue);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.link_timeout_ms, 1000);
        assert_eq!(config.placeholder.as_str(), "---");
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_timeout_shorter_than_poll_rejected() {
        let config = SessionConfig {
            link_timeout_ms: 50,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidValue));
    }
}
