//! Link configuration
//!
//! With the `serde` feature the configuration is stored as postcard binary
//! data, validated again on load.

use flamewire_protocol::{ConfigError, ReceiverConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes read from the transport per scheduler tick
pub const DEFAULT_BYTES_PER_SERVICE: u16 = 64;

/// Maximum serialized configuration size
pub const MAX_CONFIG_SIZE: usize = 16;

/// Link configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkConfigError {
    /// Receiver settings rejected
    Receiver(ConfigError),
    /// A zero read budget would never consume input
    ZeroBudget,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

impl From<ConfigError> for LinkConfigError {
    fn from(e: ConfigError) -> Self {
        LinkConfigError::Receiver(e)
    }
}

/// Link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Receiver settings
    pub receiver: ReceiverConfig,
    /// Upper bound on bytes consumed by one `service` call
    pub max_bytes_per_service: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            receiver: ReceiverConfig::default(),
            max_bytes_per_service: DEFAULT_BYTES_PER_SERVICE,
        }
    }
}

impl LinkConfig {
    /// Validate all settings
    pub fn validate(&self) -> Result<(), LinkConfigError> {
        self.receiver.validate()?;
        if self.max_bytes_per_service == 0 {
            return Err(LinkConfigError::ZeroBudget);
        }
        Ok(())
    }

    /// Serialize into `buffer`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], LinkConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| LinkConfigError::Serialize)
    }

    /// Deserialize and validate stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LinkConfigError> {
        let config: LinkConfig =
            postcard::from_bytes(bytes).map_err(|_| LinkConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let config = LinkConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.receiver.timeout_ms, 1000);
    }

    #[test]
    fn test_zero_budget() {
        let config = LinkConfig {
            max_bytes_per_service: 0,
            ..LinkConfig::default()
        };
        assert_eq!(config.validate(), Err(LinkConfigError::ZeroBudget));
    }

    #[test]
    fn test_receiver_error_propagates() {
        let config = LinkConfig {
            receiver: ReceiverConfig::new().with_timeout_ms(0),
            ..LinkConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(LinkConfigError::Receiver(ConfigError::ZeroTimeout))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stored_config_reloads() {
        let config = LinkConfig {
            receiver: ReceiverConfig::new().with_timeout_ms(300),
            max_bytes_per_service: 8,
        };
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = config.to_slice(&mut buffer).unwrap().len();
        assert_eq!(LinkConfig::from_bytes(&buffer[..len]), Ok(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stored_invalid_config_rejected() {
        let config = LinkConfig {
            receiver: ReceiverConfig::new(),
            max_bytes_per_service: 0,
        };
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = config.to_slice(&mut buffer).unwrap().len();
        assert_eq!(
            LinkConfig::from_bytes(&buffer[..len]),
            Err(LinkConfigError::ZeroBudget)
        );
        assert_eq!(
            LinkConfig::from_bytes(&[0xFF]),
            Err(LinkConfigError::Deserialize)
        );
    }
}
