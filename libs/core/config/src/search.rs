use crate::{env_parse_or, ConfigError, FromEnv};
use std::time::Duration;

/// Delay between the last keystroke and the search running
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Search behaviour configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
}

impl SearchConfig {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }
}

impl FromEnv for SearchConfig {
    /// Reads SEARCH_DEBOUNCE_MS, defaulting to 300
    fn from_env() -> Result<Self, ConfigError> {
        let millis = env_parse_or("SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        Ok(Self {
            debounce: Duration::from_millis(millis),
        })
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}
