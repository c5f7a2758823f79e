//! Command encoding
//!
//! Every command is a single pseudo-HTTP request line against `state.xml`:
//!
//! ```text
//! GET /state.xml?count1=0&count2=0&noReply=0 HTTP/1.1\r\n\r\n
//! ```

use netrelay_core::{RelayError, RelayResult};
use std::fmt;

/// Resource every command is addressed to
pub const STATE_RESOURCE: &str = "/state.xml";

/// Request terminator (end of request line plus blank line)
pub const REQUEST_TERMINATOR: &str = "\r\n\r\n";

/// Builder for the query part of a command
///
/// Parameters are emitted in insertion order and `noReply=0` is always
/// appended last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuilder {
    params: Vec<(String, String)>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key=value` parameter
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Render the full request text
    pub fn build(&self) -> String {
        let mut query = String::new();
        for (key, value) in &self.params {
            query.push_str(key);
            query.push('=');
            query.push_str(value);
            query.push('&');
        }
        query.push_str("noReply=0");
        format!("GET {}?{} HTTP/1.1{}", STATE_RESOURCE, query, REQUEST_TERMINATOR)
    }
}

/// Relay output command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RelayCommand {
    Off = 0,
    On = 1,
    Pulse = 2,
}

impl RelayCommand {
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// High-level operation understood by every supported module
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetState,
    /// Clear the trigger counter of one input (1-based)
    ClearCounter(usize),
    /// Clear the counters of inputs `1..=inputs`
    ClearAllCounters { inputs: usize },
    ClearPowerUpFlag,
    SetRelay { relay: usize, command: RelayCommand },
    PulseRelay { relay: usize, seconds: f64 },
}

impl Command {
    /// Render the request text for this command
    ///
    /// # Errors
    /// Returns `Configuration` for a non-positive or non-finite pulse time
    pub fn to_request(&self) -> RelayResult<String> {
        let builder = match self {
            Command::GetState => CommandBuilder::new(),
            Command::ClearCounter(input) => {
                CommandBuilder::new().param(format!("count{}", input), 0)
            }
            Command::ClearAllCounters { inputs } => (1..=*inputs)
                .fold(CommandBuilder::new(), |builder, input| {
                    builder.param(format!("count{}", input), 0)
                }),
            Command::ClearPowerUpFlag => CommandBuilder::new().param("powerUpFlag", 0),
            Command::SetRelay { relay, command } => {
                CommandBuilder::new().param(format!("relay{}State", relay), command.to_u8())
            }
            Command::PulseRelay { relay, seconds } => {
                if !seconds.is_finite() || *seconds <= 0.0 {
                    return Err(RelayError::Configuration(format!(
                        "Pulse time must be positive, got {}",
                        seconds
                    )));
                }
                CommandBuilder::new()
                    .param(format!("relay{}State", relay), RelayCommand::Pulse.to_u8())
                    .param(format!("pulseTime{}", relay), seconds)
            }
        };
        Ok(builder.build())
    }
}
