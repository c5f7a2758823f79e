//! netrelay - Rust client for networked relay and data-acquisition modules
//!
//! Devices of this kind expose a tiny HTTP-like interface: every command is a
//! `GET /state.xml?...` request answered by a `<datavalues>` XML document
//! describing the whole device. This library opens one TCP connection per
//! command, decodes the reply into a typed snapshot and can poll the device
//! in the background.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `netrelay-core`: Error type, endpoint, credential and defaults
//! - `netrelay-transport`: Transport layer (TCP, scripted in-memory)
//! - `netrelay-codec`: Command builder, request encoding, XML decoding
//! - `netrelay-device`: State decoders per device family
//! - `netrelay-client`: Session, poll cycle and event fan-out
//!
//! # Usage
//!
//! ```no_run
//! use netrelay::client::SessionBuilder;
//! use netrelay::device::FiveInputModule;
//!
//! # async fn run() -> netrelay::RelayResult<()> {
//! let session = SessionBuilder::new(FiveInputModule)
//!     .address("192.168.1.2")
//!     .build()?;
//!
//! if let Some(state) = session.get_state().await? {
//!     println!("input 1 is {:?}", state.input(1)?);
//! }
//! session.clear_counter(3).await?;
//! session.dispose().await;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use netrelay_core::{Credential, Endpoint, FailureKind, RelayError, RelayResult};

pub mod transport {
    pub use netrelay_transport::*;
}

pub mod codec {
    pub use netrelay_codec::*;
}

// Re-export device families
pub mod device {
    pub use netrelay_device::*;
}

// Re-export client API
pub mod client {
    pub use netrelay_client::*;
}
