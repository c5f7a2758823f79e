//! Stream accessor trait for transport layer

use async_trait::async_trait;
use netrelay_core::{Endpoint, RelayError, RelayResult};
use std::time::Duration;

/// Stream accessor interface to the duplex byte stream of one device
#[async_trait]
pub trait StreamAccessor: Send + Sync {
    /// Set the connect/read/write timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration. None means infinite timeout.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> RelayResult<()>;

    /// Read data from the stream
    ///
    /// Performs exactly one read call and returns whatever was available,
    /// up to `buf.len()` bytes. It never loops waiting for a terminator.
    ///
    /// # Returns
    ///
    /// Number of bytes read, or 0 if the peer sent nothing before closing
    async fn read(&mut self, buf: &mut [u8]) -> RelayResult<usize>;

    /// Write data to the stream
    ///
    /// # Returns
    ///
    /// Number of bytes written
    async fn write(&mut self, buf: &[u8]) -> RelayResult<usize>;

    /// Write all data to the stream
    async fn write_all(&mut self, buf: &[u8]) -> RelayResult<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..]).await?;
            if n == 0 {
                return Err(RelayError::Io("Failed to write all data".to_string()));
            }
            written += n;
        }
        Ok(())
    }

    /// Flush any buffered data
    async fn flush(&mut self) -> RelayResult<()>;

    /// Whether a stream is held and the socket still reports connected
    fn is_connected(&self) -> bool;

    /// Whether the stream can currently be read
    fn can_read(&self) -> bool;

    /// Whether the stream can currently be written
    fn can_write(&self) -> bool;

    /// Close the stream and socket
    ///
    /// Idempotent; safe to call when never connected.
    async fn close(&mut self) -> RelayResult<()>;
}

/// Transport layer trait that extends StreamAccessor
#[async_trait]
pub trait TransportLayer: StreamAccessor {
    /// Open a connection to `endpoint`
    ///
    /// A no-op when already connected.
    ///
    /// # Errors
    ///
    /// * `Configuration` if the endpoint address is unset
    /// * `Network` if the underlying connect call fails
    async fn open(&mut self, endpoint: &Endpoint) -> RelayResult<()>;
}
