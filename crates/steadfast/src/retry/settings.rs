//! Declarative retry settings loadable from any serde format.

use super::backoff::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY};
use super::config::{DEFAULT_MAX_RETRIES, RetryConfig};
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The serializable half of a [`RetryConfig`].
///
/// Closures cannot be deserialized, so a config built from settings always
/// uses the transient-error classifier and no retry hook. Missing fields take
/// their defaults.
///
/// # Examples
///
/// ```rust
/// use steadfast::retry::RetrySettings;
/// use std::time::Duration;
///
/// let settings = RetrySettings::from_json(r#"{ "max_retries": 5, "base_delay_ms": 250 }"#)?;
/// let config = settings.into_config();
///
/// assert_eq!(config.max_retries(), 5);
/// assert_eq!(config.base_delay(), Duration::from_millis(250));
/// assert_eq!(config.max_delay(), Duration::from_secs(10));
/// # Ok::<(), steadfast::error::SettingsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
    /// Cap on the un-jittered delay, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            max_delay_ms: DEFAULT_MAX_DELAY.as_millis() as u64,
        }
    }
}

impl RetrySettings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings whose base delay exceeds the cap.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.base_delay_ms > self.max_delay_ms {
            return Err(SettingsError::InvertedDelays {
                base_delay_ms: self.base_delay_ms,
                max_delay_ms: self.max_delay_ms,
            });
        }
        Ok(())
    }

    /// Build a [`RetryConfig`] from these settings.
    pub fn into_config(self) -> RetryConfig {
        self.into()
    }
}

impl From<RetrySettings> for RetryConfig {
    fn from(settings: RetrySettings) -> Self {
        RetryConfig::builder()
            .max_retries(settings.max_retries)
            .base_delay(Duration::from_millis(settings.base_delay_ms))
            .max_delay(Duration::from_millis(settings.max_delay_ms))
            .build()
    }
}
