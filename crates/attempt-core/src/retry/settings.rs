//! File-friendly backoff settings.

use super::exponential::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable exponential backoff settings.
///
/// Durations are plain milliseconds so the settings read naturally from TOML,
/// JSON or environment-driven config layers. Unset fields fall back to the
/// [`ExponentialBackoff`] defaults.
///
/// # Examples
///
/// ```rust
/// use attempt_core::retry::BackoffSettings;
/// use std::time::Duration;
///
/// let settings: BackoffSettings =
///     serde_json::from_str(r#"{ "initial_delay_ms": 250, "jitter": 0.0 }"#).unwrap();
/// let backoff = settings.build();
///
/// assert_eq!(backoff.initial_delay(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackoffSettings {
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor applied per retry.
    pub multiplier: f64,
    /// Randomization factor between 0.0 and 1.0.
    pub jitter: f64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self::from(&ExponentialBackoff::default())
    }
}

impl BackoffSettings {
    /// Build the exponential backoff these settings describe.
    pub fn build(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .multiplier(self.multiplier)
            .jitter(self.jitter)
            .build()
    }
}

impl From<&ExponentialBackoff> for BackoffSettings {
    fn from(backoff: &ExponentialBackoff) -> Self {
        Self {
            initial_delay_ms: u64::try_from(backoff.initial_delay.as_millis()).unwrap_or(u64::MAX),
            max_delay_ms: u64::try_from(backoff.max_delay.as_millis()).unwrap_or(u64::MAX),
            multiplier: backoff.multiplier,
            jitter: backoff.jitter,
        }
    }
}
