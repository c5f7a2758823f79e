//! TCP transport implementation

use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use netrelay_core::constants::DEFAULT_IO_TIMEOUT_SECS;
use netrelay_core::{Endpoint, RelayError, RelayResult};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Wrapper for TcpStream that implements Debug
struct DebugTcpStream(TcpStream);

impl fmt::Debug for DebugTcpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpStream").finish()
    }
}

impl Deref for DebugTcpStream {
    type Target = TcpStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugTcpStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// TCP transport layer settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub timeout: Option<Duration>,
    pub nodelay: bool,
}

impl TcpSettings {
    /// Create TCP settings with timeout
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            nodelay: true,
        }
    }
}

impl Default for TcpSettings {
    fn default() -> Self {
        Self::with_timeout(Some(Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS)))
    }
}

/// TCP transport layer implementation
///
/// Each `open` creates a fresh socket; `close` drops it.
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<DebugTcpStream>,
    settings: TcpSettings,
    closed: bool,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    /// Create TCP transport from an already-connected TcpStream
    pub fn from_connected_stream(stream: TcpStream, timeout: Option<Duration>) -> Self {
        Self {
            stream: Some(DebugTcpStream(stream)),
            settings: TcpSettings::with_timeout(timeout),
            closed: false,
        }
    }

    fn stream_mut(&mut self) -> RelayResult<&mut DebugTcpStream> {
        if self.closed {
            return Err(RelayError::Io("TCP stream not connected".to_string()));
        }
        self.stream
            .as_mut()
            .ok_or_else(|| RelayError::Io("TCP stream not connected".to_string()))
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(TcpSettings::default())
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self, endpoint: &Endpoint) -> RelayResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let (host, port) = endpoint.socket_target()?;
        let network_error = |source: std::io::Error| RelayError::Network {
            endpoint: endpoint.clone(),
            source,
        };

        // Apply timeout to connection establishment if specified
        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect((host, port)))
                .await
                .map_err(|_| {
                    network_error(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("connect timed out after {:?}", timeout),
                    ))
                })?
                .map_err(network_error)?
        } else {
            TcpStream::connect((host, port)).await.map_err(network_error)?
        };

        if self.settings.nodelay {
            let _ = stream.set_nodelay(true);
        }

        log::debug!("Connected to {}", endpoint);
        self.stream = Some(DebugTcpStream(stream));
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for TcpTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> RelayResult<()> {
        self.settings.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> RelayResult<usize> {
        let timeout = self.settings.timeout;
        let stream = self.stream_mut()?;

        let result = if let Some(timeout) = timeout {
            tokio::time::timeout(timeout, stream.read(buf))
                .await
                .map_err(|_| RelayError::Timeout(format!("read timed out after {:?}", timeout)))?
                .map_err(|e| RelayError::Io(e.to_string()))
        } else {
            stream.read(buf).await.map_err(|e| RelayError::Io(e.to_string()))
        };

        match result {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.closed = true;
                Err(e)
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> RelayResult<usize> {
        let timeout = self.settings.timeout;
        let stream = self.stream_mut()?;

        if let Some(timeout) = timeout {
            tokio::time::timeout(timeout, stream.write(buf))
                .await
                .map_err(|_| RelayError::Timeout(format!("write timed out after {:?}", timeout)))?
                .map_err(|e| RelayError::Io(e.to_string()))
        } else {
            stream.write(buf).await.map_err(|e| RelayError::Io(e.to_string()))
        }
    }

    async fn flush(&mut self) -> RelayResult<()> {
        let stream = self.stream_mut()?;
        stream.flush().await.map_err(|e| RelayError::Io(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        !self.closed
            && self
                .stream
                .as_ref()
                .is_some_and(|stream| stream.peer_addr().is_ok())
    }

    fn can_read(&self) -> bool {
        self.is_connected()
    }

    fn can_write(&self) -> bool {
        self.is_connected()
    }

    async fn close(&mut self) -> RelayResult<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_tcp_settings() {
        let settings = TcpSettings::default();
        assert_eq!(
            settings.timeout,
            Some(Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS))
        );
        assert!(settings.nodelay);
    }

    #[tokio::test]
    async fn test_open_without_address_is_configuration_error() {
        let mut transport = TcpTransport::default();
        let err = transport.open(&Endpoint::default()).await.unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut transport = TcpTransport::default();
        let endpoint = Endpoint::new("127.0.0.1", port).unwrap();
        let err = transport.open(&endpoint).await.unwrap_err();
        assert!(matches!(err, RelayError::Network { .. }));
    }

    #[tokio::test]
    async fn test_write_when_closed_is_io_error() {
        let mut transport = TcpTransport::default();
        assert_err!(transport.write(b"GET").await);
        let mut buf = [0u8; 8];
        assert_err!(transport.read(&mut buf).await);
        assert_ok!(transport.close().await);
        assert_ok!(transport.close().await);
    }

    #[tokio::test]
    async fn test_loopback_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 256];
            let n = socket.read(&mut request).await.unwrap();
            request.truncate(n);
            socket.write_all(b"<datavalues></datavalues>").await.unwrap();
            request
        });

        let endpoint = Endpoint::new("127.0.0.1", port).unwrap();
        let mut transport = TcpTransport::default();
        assert_ok!(transport.open(&endpoint).await);
        assert!(transport.is_connected());
        assert!(transport.can_read() && transport.can_write());

        // Second open is a no-op
        assert_ok!(transport.open(&endpoint).await);

        transport.write_all(b"GET /state.xml?noReply=0 HTTP/1.1\r\n\r\n").await.unwrap();
        transport.flush().await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with(b"GET /state.xml"));

        let mut buf = vec![0u8; 1024];
        let n = transport.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"<datavalues></datavalues>");

        transport.close().await.unwrap();
        assert!(!transport.is_connected());
    }
}
