//! Session configuration
//!
//! `SessionConfig` can be embedded in a host application's own configuration
//! file; every field has a default so partial documents deserialize.
//!
//! ```toml
//! address = "192.168.1.2"
//! port = 80
//! auth_enabled = true
//! password = "webrelay"
//! poll_interval_secs = 2
//! ```

use netrelay_core::constants::{
    DEFAULT_IO_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_PORT,
    DEFAULT_RECEIVE_BUFFER_SIZE, DEFAULT_SHUTDOWN_GRACE,
};
use netrelay_core::{Credential, Endpoint, RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Host name or IP address of the device
    pub address: Option<String>,
    pub port: u16,
    /// Send the basic-auth header with every command
    pub auth_enabled: bool,
    #[serde(skip_serializing)]
    pub password: Option<Credential>,
    pub poll_interval_secs: u64,
    /// Size of the single read per exchange
    pub receive_buffer_size: usize,
    /// Connect/read/write timeout; `None` waits indefinitely
    pub io_timeout_secs: Option<u64>,
    /// How long disposal waits for the poll task
    pub shutdown_grace_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: DEFAULT_PORT,
            auth_enabled: false,
            password: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            receive_buffer_size: DEFAULT_RECEIVE_BUFFER_SIZE,
            io_timeout_secs: Some(DEFAULT_IO_TIMEOUT_SECS),
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE.as_millis() as u64,
        }
    }
}

impl SessionConfig {
    /// Check every field
    ///
    /// # Errors
    /// Returns `Configuration` for a zero port, poll interval or buffer size
    pub fn validate(&self) -> RelayResult<()> {
        self.endpoint()?;
        if self.poll_interval_secs == 0 {
            return Err(RelayError::Configuration(
                "Poll interval must be positive".to_string(),
            ));
        }
        if self.receive_buffer_size == 0 {
            return Err(RelayError::Configuration(
                "Receive buffer size must be positive".to_string(),
            ));
        }
        if self.io_timeout_secs == Some(0) {
            return Err(RelayError::Configuration(
                "I/O timeout must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Endpoint described by `address` and `port`
    ///
    /// The address may still be unset; that only fails at connect time.
    pub fn endpoint(&self) -> RelayResult<Endpoint> {
        let mut endpoint = Endpoint::default();
        if let Some(address) = &self.address {
            endpoint.set_address(address.as_str())?;
        }
        endpoint.set_port(u32::from(self.port))?;
        Ok(endpoint)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 80);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.endpoint().unwrap().address(), None);
    }

    #[test]
    fn test_invalid_values() {
        let config = SessionConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RelayError::Configuration(_))
        ));

        let config = SessionConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            receive_buffer_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            address: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = SessionConfig {
            password: Some(Credential::new("secret")),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["port"], 80);
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"address": "192.168.1.2", "auth_enabled": true, "password": "webrelay"}"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 80);
        assert_eq!(config.password.unwrap().expose(), "webrelay");
    }
}
