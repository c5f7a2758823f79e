//! Transport layer module for networked relay modules
//!
//! This crate provides the transport abstraction used by the session engine
//! together with a TCP implementation and a scripted in-memory one.

pub mod memory;
pub mod stream;
pub mod tcp;

pub use memory::{MemoryHandle, MemoryTransport, ScriptedReply};
pub use stream::{StreamAccessor, TransportLayer};
pub use tcp::{TcpSettings, TcpTransport};
