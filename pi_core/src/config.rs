//! # Engine Configuration
//!
//! Settings for a [`PiEngine`](crate::engine::PiEngine). Every field has a
//! default, so a config file only needs the keys it changes.
//!
//! ## TOML Example
//!
//! ```toml
//! # Give up on a parallel computation after 10 minutes
//! deadline_ms = 600000
//! # Carry 16 extra digits through the computation
//! guard_digits = 16
//! ```
//!
//! ```rust
//! use pi_core::config::EngineConfig;
//! use std::time::Duration;
//!
//! let config = EngineConfig::from_toml_str("deadline_ms = 600000").unwrap();
//! assert_eq!(config.deadline(), Duration::from_secs(600));
//! assert_eq!(config.guard_digits, pi_core::precision::DEFAULT_GUARD_DIGITS);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{PiError, PiResult};
use crate::precision::{DEFAULT_GUARD_DIGITS, MAX_GUARD_DIGITS, MIN_GUARD_DIGITS};

/// Default overall deadline of a parallel computation (30 minutes)
pub const DEFAULT_DEADLINE_MS: u64 = 30 * 60 * 1000;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How long the parallel path waits for its workers, in milliseconds
    pub deadline_ms: u64,

    /// Extra significant digits carried internally
    pub guard_digits: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            deadline_ms: DEFAULT_DEADLINE_MS,
            guard_digits: DEFAULT_GUARD_DIGITS,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parallel deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the guard-digit margin.
    pub fn with_guard_digits(mut self, guard_digits: u64) -> Self {
        self.guard_digits = guard_digits;
        self
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> PiResult<()> {
        if self.guard_digits < MIN_GUARD_DIGITS {
            return Err(PiError::invalid_input(
                "guard_digits",
                self.guard_digits.to_string(),
                format!("At least {} guard digits are required", MIN_GUARD_DIGITS),
            ));
        }
        if self.guard_digits > MAX_GUARD_DIGITS {
            return Err(PiError::invalid_input(
                "guard_digits",
                self.guard_digits.to_string(),
                format!("At most {} guard digits are allowed", MAX_GUARD_DIGITS),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> PiResult<Self> {
        Self::parse(source, "<inline>")
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> PiResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| PiError::config_error(path.display().to_string(), e.to_string()))?;
        Self::parse(&source, &path.display().to_string())
    }

    fn parse(source: &str, origin: &str) -> PiResult<Self> {
        let config: EngineConfig =
            toml::from_str(source).map_err(|e| PiError::config_error(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
