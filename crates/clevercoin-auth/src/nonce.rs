//! Time-derived request nonces
//!
//! A nonce is the Unix time in whole seconds followed by exactly six digits of
//! microseconds, e.g. `1700000000123456`. It is regenerated for every signed
//! request and never cached.
//!
//! The value is taken straight from the clock. If the clock steps backwards,
//! or two requests are signed within the same microsecond, the exchange will
//! see a repeated or decreasing nonce and reject the request.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time, as a duration since the Unix epoch
pub trait Clock: Send + Sync {
    /// Current time since the Unix epoch
    fn now(&self) -> Duration;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// Clock frozen at a fixed instant
///
/// Useful for reproducing a signature exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Duration);

impl Clock for FixedClock {
    fn now(&self) -> Duration {
        self.0
    }
}

/// Single-use nonce for a signed request
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Build a nonce from a duration since the Unix epoch
    pub fn from_duration(since_epoch: Duration) -> Self {
        Self(format!(
            "{}{:06}",
            since_epoch.as_secs(),
            since_epoch.subsec_micros()
        ))
    }

    /// Build a nonce from the given clock
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::from_duration(clock.now())
    }

    /// Build a nonce from the system clock
    pub fn now() -> Self {
        Self::from_clock(&SystemClock)
    }

    /// Get the nonce as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Nonce {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Nonce {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
