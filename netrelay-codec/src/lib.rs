//! Command codec for networked relay modules
//!
//! This crate turns high-level operations into the devices' pseudo-HTTP
//! request lines and turns the raw bytes of a single read back into a typed
//! state snapshot through a per-family [`StateDecoder`].
//!
//! # Status
//!
//! - [x] `state.xml` request line encoding
//! - [x] Basic authentication header
//! - [x] NUL padding / HTTP preamble trimming
//! - [x] `401 Authorization Required` detection
//! - [x] Decoder collaborator interface and field helpers

pub mod codec;
pub mod command;
pub mod decoder;

pub use codec::CommandCodec;
pub use command::{Command, CommandBuilder, RelayCommand, REQUEST_TERMINATOR, STATE_RESOURCE};
pub use decoder::{Fields, RelayControl, StateDecoder};

/// Re-exported so decoders can name the node type without a direct dependency
pub use roxmltree;
