//! Session builder
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use netrelay_client::SessionBuilder;
//! use netrelay_device::SensorRelayModule;
//! use std::time::Duration;
//!
//! # fn build() -> netrelay_core::RelayResult<()> {
//! let session = SessionBuilder::new(SensorRelayModule)
//!     .address("192.168.1.2")
//!     .port(8080)
//!     .basic_auth("webrelay")
//!     .poll_interval(Duration::from_secs(5))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::config::SessionConfig;
use crate::session::Session;
use netrelay_codec::StateDecoder;
use netrelay_core::{Credential, RelayResult};
use netrelay_transport::{TcpSettings, TcpTransport, TransportLayer};
use std::time::Duration;

/// Fluent builder for a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionBuilder<D> {
    decoder: D,
    config: SessionConfig,
}

impl<D: StateDecoder> SessionBuilder<D> {
    /// Create a builder with default settings
    ///
    /// # Default Settings
    /// - Port: 80
    /// - Poll interval: 1 second
    /// - I/O timeout: 30 seconds
    /// - Basic auth: disabled
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            config: SessionConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Device host name or IP address
    pub fn address(mut self, address: &str) -> Self {
        self.config.address = Some(address.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable basic authentication with `password`
    pub fn basic_auth(mut self, password: impl Into<Credential>) -> Self {
        self.config.auth_enabled = true;
        self.config.password = Some(password.into());
        self
    }

    /// Interval between polls; sub-second values round up to one second
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_secs = interval.as_secs_f64().ceil() as u64;
        self
    }

    /// Connect/read/write timeout, `None` to wait indefinitely
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout_secs = timeout.map(|t| t.as_secs_f64().ceil() as u64);
        self
    }

    pub fn receive_buffer_size(mut self, size: usize) -> Self {
        self.config.receive_buffer_size = size;
        self
    }

    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.config.shutdown_grace_ms = grace.as_millis() as u64;
        self
    }

    /// Build a session over TCP
    ///
    /// # Errors
    /// Returns `Configuration` if the configuration is invalid
    pub fn build(self) -> RelayResult<Session<D, TcpTransport>> {
        let transport = TcpTransport::new(TcpSettings::with_timeout(self.config.io_timeout()));
        Session::new(self.decoder, transport, self.config)
    }

    /// Build a session over a caller-supplied transport
    pub fn build_with_transport<T>(self, transport: T) -> RelayResult<Session<D, T>>
    where
        T: TransportLayer + 'static,
    {
        Session::new(self.decoder, transport, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netrelay_core::RelayError;
    use netrelay_device::FiveInputModule;
    use netrelay_transport::MemoryTransport;

    #[tokio::test]
    async fn test_build_tcp_session() {
        let session = SessionBuilder::new(FiveInputModule)
            .address("192.168.1.2")
            .port(8080)
            .basic_auth("webrelay")
            .poll_interval(Duration::from_millis(2500))
            .build()
            .unwrap();

        let endpoint = session.endpoint().await;
        assert_eq!(endpoint.address(), Some("192.168.1.2"));
        assert_eq!(endpoint.port(), 8080);
        assert!(session.is_auth_enabled().await);
        assert_eq!(session.poll_interval(), Duration::from_secs(3));
        assert!(!session.is_polling());
    }

    #[test]
    fn test_invalid_port() {
        let result = SessionBuilder::new(FiveInputModule)
            .address("192.168.1.2")
            .port(0)
            .build();
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let result = SessionBuilder::new(FiveInputModule)
            .receive_buffer_size(0)
            .build_with_transport(MemoryTransport::new());
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }
}
