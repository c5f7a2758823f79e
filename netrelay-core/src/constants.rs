//! Process-wide defaults

use std::time::Duration;

/// Default TCP port of the device web interface
pub const DEFAULT_PORT: u16 = 80;

/// Default interval between two polls, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default relay pulse time, in seconds
pub const DEFAULT_PULSE_TIME_SECS: f64 = 1.5;

/// Size of the single receive buffer used per exchange
pub const DEFAULT_RECEIVE_BUFFER_SIZE: usize = 8192;

/// Default connect/read/write timeout, in seconds
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;

/// How long disposal waits for the poll task to exit
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(2000);

/// User name the devices expect in the basic-auth header
pub const AUTH_USER: &str = "none";

/// Root element of every state document
pub const STATE_ROOT_ELEMENT: &str = "datavalues";

/// Marker the device sends when authentication is rejected
pub const AUTH_REJECTED_MARKER: &str = "401 Authorization Required";
