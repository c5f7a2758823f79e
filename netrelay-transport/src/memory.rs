//! In-memory transport driven by a script of responses
//!
//! Stands in for a device when no hardware is reachable: every `open` counts
//! as a fresh connection, every write is recorded, and every read pops the
//! next scripted reply. An exhausted script reads as zero bytes.

use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use bytes::Bytes;
use netrelay_core::{Endpoint, RelayError, RelayResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One scripted outcome for a read
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Data(Bytes),
    Error(String),
    /// Wait before delivering the inner reply
    Delayed(Duration, Box<ScriptedReply>),
}

#[derive(Debug, Default)]
struct MemoryScript {
    replies: VecDeque<ScriptedReply>,
    written: Vec<Vec<u8>>,
    refuse_connect: bool,
    connect_silently_fails: bool,
    unreadable: bool,
    opens: usize,
    closes: usize,
}

/// Handle used to feed and inspect a [`MemoryTransport`]
#[derive(Debug, Clone, Default)]
pub struct MemoryHandle {
    script: Arc<Mutex<MemoryScript>>,
}

impl MemoryHandle {
    fn lock(&self) -> MutexGuard<'_, MemoryScript> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a reply for the next read
    pub fn push_reply(&self, data: impl Into<Bytes>) {
        self.lock().replies.push_back(ScriptedReply::Data(data.into()));
    }

    /// Queue a read failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().replies.push_back(ScriptedReply::Error(message.into()));
    }

    /// Queue a reply delivered after `delay`
    pub fn push_delayed_reply(&self, delay: Duration, data: impl Into<Bytes>) {
        self.lock().replies.push_back(ScriptedReply::Delayed(
            delay,
            Box::new(ScriptedReply::Data(data.into())),
        ));
    }

    /// Make subsequent `open` calls fail with a network error
    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse_connect = refuse;
    }

    /// Make subsequent `open` calls return `Ok` without connecting
    pub fn fail_connect_silently(&self, fail: bool) {
        self.lock().connect_silently_fails = fail;
    }

    /// Report the stream as connected but not readable/writable
    pub fn set_unreadable(&self, unreadable: bool) {
        self.lock().unreadable = unreadable;
    }

    /// Requests written so far, one entry per write call
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.lock().written.clone()
    }

    pub fn open_count(&self) -> usize {
        self.lock().opens
    }

    pub fn close_count(&self) -> usize {
        self.lock().closes
    }

    pub fn pending_replies(&self) -> usize {
        self.lock().replies.len()
    }
}

/// Scripted transport
#[derive(Debug, Default)]
pub struct MemoryTransport {
    handle: MemoryHandle,
    connected: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle sharing this transport's script
    pub fn handle(&self) -> MemoryHandle {
        self.handle.clone()
    }
}

#[async_trait]
impl TransportLayer for MemoryTransport {
    async fn open(&mut self, endpoint: &Endpoint) -> RelayResult<()> {
        if self.connected {
            return Ok(());
        }
        endpoint.socket_target()?;

        let mut script = self.handle.lock();
        if script.refuse_connect {
            return Err(RelayError::Network {
                endpoint: endpoint.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ),
            });
        }
        if script.connect_silently_fails {
            return Ok(());
        }
        script.opens += 1;
        drop(script);

        self.connected = true;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for MemoryTransport {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> RelayResult<()> {
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> RelayResult<usize> {
        if !self.connected {
            return Err(RelayError::Io("Memory stream not connected".to_string()));
        }

        let mut reply = self.handle.lock().replies.pop_front();
        loop {
            match reply {
                None => return Ok(0),
                Some(ScriptedReply::Data(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    return Ok(n);
                }
                Some(ScriptedReply::Error(message)) => return Err(RelayError::Io(message)),
                Some(ScriptedReply::Delayed(delay, inner)) => {
                    tokio::time::sleep(delay).await;
                    reply = Some(*inner);
                }
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> RelayResult<usize> {
        if !self.connected {
            return Err(RelayError::Io("Memory stream not connected".to_string()));
        }
        self.handle.lock().written.push(buf.to_vec());
        Ok(buf.len())
    }

    async fn flush(&mut self) -> RelayResult<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn can_read(&self) -> bool {
        self.connected && !self.handle.lock().unreadable
    }

    fn can_write(&self) -> bool {
        self.connected && !self.handle.lock().unreadable
    }

    async fn close(&mut self) -> RelayResult<()> {
        if self.connected {
            self.connected = false;
            self.handle.lock().closes += 1;
        }
        Ok(())
    }
}
