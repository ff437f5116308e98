//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default overall request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Largest accepted request timeout in seconds (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Default config file written by `init`.
pub const CONFIG_FILE: &str = "feishu-bot.toml";

/// Default overall request timeout as Duration.
#[must_use]
pub const fn request_timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
