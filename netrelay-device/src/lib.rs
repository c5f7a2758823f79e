//! Device families for networked relay modules
//!
//! Each family provides a [`StateDecoder`](netrelay_codec::StateDecoder)
//! and the snapshot type it produces.
//!
//! - [`FiveInputModule`]: five digital inputs with trigger counters
//! - [`SensorRelayModule`]: relays, digital and analog inputs, six
//!   temperature/humidity sensor channels

pub mod five_input;
pub mod level;
pub mod sensor_relay;

pub use five_input::{FiveInputModule, FiveInputState};
pub use level::Level;
pub use sensor_relay::{SensorRelayModule, SensorRelayState};

use netrelay_core::{RelayError, RelayResult};

/// 1-based lookup into an ordered channel list
pub(crate) fn channel<T: Copy>(what: &'static str, items: &[T], index: usize) -> RelayResult<T> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .copied()
        .ok_or_else(|| RelayError::index_out_of_range(what, index, items.len()))
}
