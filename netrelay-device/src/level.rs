//! Two-state level of an input or relay

use netrelay_codec::Fields;
use netrelay_core::RelayResult;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    Off,
    On,
}

impl Level {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Read a `0`/`1` element as a level
    pub(crate) fn read(fields: &Fields<'_, '_>, name: &str) -> RelayResult<Self> {
        fields.flag(name).map(Self::from)
    }
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}
