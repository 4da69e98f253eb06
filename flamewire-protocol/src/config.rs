//! Receiver configuration
//!
//! Frame capacity is a compile-time parameter of [`Receiver`](crate::Receiver).
//! Everything tunable at runtime lives here and can be stored as postcard
//! binary data when the `serde` feature is enabled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::DEFAULT_TIMEOUT_MS;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A zero timeout would discard every multi-byte frame
    ZeroTimeout,
}

/// Runtime receiver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverConfig {
    /// Maximum gap between bytes of one frame (ms)
    pub timeout_ms: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiverConfig {
    /// Reference configuration
    pub const fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the inter-byte timeout
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check the configuration for values the receiver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
