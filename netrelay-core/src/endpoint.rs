//! Network endpoint of a relay module

use crate::constants::DEFAULT_PORT;
use crate::error::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address and port of one device
///
/// The address may be left unset until the owner configures it; connecting
/// with an unset address is a configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    address: Option<String>,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint, validating the port
    ///
    /// # Errors
    /// Returns `Configuration` if the address is blank or the port is 0
    pub fn new(address: impl Into<String>, port: u16) -> RelayResult<Self> {
        let mut endpoint = Self::default();
        endpoint.set_address(address)?;
        endpoint.set_port(u32::from(port))?;
        Ok(endpoint)
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Set the host name or IP address
    pub fn set_address(&mut self, address: impl Into<String>) -> RelayResult<()> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(RelayError::Configuration(
                "Endpoint address must not be empty".to_string(),
            ));
        }
        self.address = Some(trimmed.to_string());
        Ok(())
    }

    /// Set the TCP port
    ///
    /// # Errors
    /// Returns `Configuration` unless `port` is within 1..=65535
    pub fn set_port(&mut self, port: u32) -> RelayResult<()> {
        match u16::try_from(port) {
            Ok(p) if p != 0 => {
                self.port = p;
                Ok(())
            }
            _ => Err(RelayError::Configuration(format!(
                "Port {} is outside 1..=65535",
                port
            ))),
        }
    }

    /// Host/port pair suitable for `TcpStream::connect`
    pub fn socket_target(&self) -> RelayResult<(&str, u16)> {
        let address = self.address.as_deref().ok_or_else(|| {
            RelayError::Configuration("Endpoint address is not set".to_string())
        })?;
        Ok((address, self.port))
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            address: None,
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) if address.contains(':') => write!(f, "[{}]:{}", address, self.port),
            Some(address) => write!(f, "{}:{}", address, self.port),
            None => write!(f, "<unset>:{}", self.port),
        }
    }
}
