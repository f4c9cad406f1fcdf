//! Configuration for the reservation actor.
//!
//! Defaults reproduce the reference timings: a 100-slot mailbox, a 5 second
//! hold, a borrow attempt 100 ms after the hold is placed and a 5 second
//! deadline for callers waiting on a reply.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReservationConfig {
    /// Capacity of the actor's bounded mailbox.
    pub mailbox_capacity: usize,
    /// How long a hold stays live before it expires.
    pub hold_duration_ms: u64,
    /// Delay before the background borrow attempt runs.
    pub borrow_delay_ms: u64,
    /// Deadline for enqueueing a request and receiving its reply.
    pub submit_timeout_ms: u64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 100,
            hold_duration_ms: 5_000,
            borrow_delay_ms: 100,
            submit_timeout_ms: 5_000,
        }
    }
}

impl ReservationConfig {
    /// Load configuration from an optional file and environment variables.
    ///
    /// Sources, later ones winning:
    /// 1. built-in defaults
    /// 2. `config/library.{toml,yaml,json}` if present
    /// 3. `LIBRARY_*` environment variables (e.g. `LIBRARY_HOLD_DURATION_MS=2000`)
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/library").required(false))
            .add_source(Environment::with_prefix("LIBRARY").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    pub fn borrow_delay(&self) -> Duration {
        Duration::from_millis(self.borrow_delay_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}
