//! Client implementation for networked relay modules
//!
//! This crate provides the session engine: one-shot command exchanges
//! against a device and a background poll cycle that reports snapshots and
//! failures through subscribed event sinks.
//!
//! # Status
//!
//! ## 会话
//! - [x] Connect / disconnect with stale-transport replacement
//! - [x] One exchange per connection (connect, write, single read, disconnect)
//! - [x] Basic authentication
//! - [x] Counter / power-up flag / relay commands
//! - [x] Disposal with credential scrubbing
//!
//! ## 轮询
//! - [x] Single poll task per session
//! - [x] Stop on first failure with failure event
//! - [x] Bounded wait for the poll task on disposal
//! - [ ] Accumulating reads for responses split across TCP segments

pub mod builder;
pub mod config;
pub mod events;
mod poller;
pub mod session;

pub use builder::SessionBuilder;
pub use config::SessionConfig;
pub use events::{CallbackSink, EventDispatcher, EventSink, SubscriptionId};
pub use session::Session;
