//! Five-input module
//!
//! # State document
//!
//! ```xml
//! <datavalues>
//!   <input1state>1</input1state> ... <input5state>0</input5state>
//!   <count1>12</count1> ... <count5>0</count5>
//!   <powerupflag>1</powerupflag>
//! </datavalues>
//! ```

use crate::channel;
use crate::level::Level;
use netrelay_codec::{Fields, StateDecoder};
use netrelay_core::RelayResult;
use roxmltree::Node;
use serde::Serialize;

/// Number of inputs on the module
pub const INPUT_COUNT: usize = 5;

/// Snapshot of a five-input module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiveInputState {
    inputs: Vec<Level>,
    counters: Vec<u32>,
    power_up: bool,
}

impl FiveInputState {
    /// Level of input `n` (1-based)
    pub fn input(&self, n: usize) -> RelayResult<Level> {
        channel("input", &self.inputs, n)
    }

    /// Trigger counter of input `n` (1-based)
    pub fn counter(&self, n: usize) -> RelayResult<u32> {
        channel("counter", &self.counters, n)
    }

    pub fn inputs(&self) -> &[Level] {
        &self.inputs
    }

    pub fn counters(&self) -> &[u32] {
        &self.counters
    }

    /// Whether the module lost and regained power since the flag was cleared
    pub fn power_up_flag(&self) -> bool {
        self.power_up
    }
}

/// Decoder for the five-input module
#[derive(Debug, Clone, Copy, Default)]
pub struct FiveInputModule;

impl StateDecoder for FiveInputModule {
    type State = FiveInputState;

    fn family(&self) -> &'static str {
        "five-input"
    }

    fn input_count(&self) -> usize {
        INPUT_COUNT
    }

    fn decode(&self, root: Node<'_, '_>) -> RelayResult<FiveInputState> {
        let fields = Fields::new(root);
        Ok(FiveInputState {
            inputs: fields.indexed("input", "state", INPUT_COUNT, Level::read)?,
            counters: fields.indexed("count", "", INPUT_COUNT, |f, name| f.number(name))?,
            power_up: fields.flag("powerupflag")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netrelay_codec::CommandCodec;
    use netrelay_core::RelayError;

    const SAMPLE: &str = "<datavalues>\
        <input1state>1</input1state><input2state>0</input2state><input3state>0</input3state>\
        <input4state>1</input4state><input5state>0</input5state>\
        <count1>7</count1><count2>0</count2><count3>0</count3><count4>3</count4><count5>0</count5>\
        <powerupflag>1</powerupflag></datavalues>";

    fn decode(xml: &str) -> RelayResult<Option<FiveInputState>> {
        let mut raw = xml.as_bytes().to_vec();
        raw.extend(std::iter::repeat_n(0u8, 50));
        CommandCodec::default().decode(&FiveInputModule, &mut raw)
    }

    #[test]
    fn test_decode_sample() {
        let state = decode(SAMPLE).unwrap().unwrap();
        assert_eq!(state.input(1).unwrap(), Level::On);
        assert_eq!(state.input(2).unwrap(), Level::Off);
        assert_eq!(state.input(4).unwrap(), Level::On);
        assert_eq!(state.counter(1).unwrap(), 7);
        assert_eq!(state.counter(4).unwrap(), 3);
        assert!(state.power_up_flag());
        assert_eq!(state.inputs().len(), INPUT_COUNT);
    }

    #[test]
    fn test_accessor_range() {
        let state = decode(SAMPLE).unwrap().unwrap();
        for n in [0, 6, 100] {
            assert!(matches!(
                state.input(n),
                Err(RelayError::OutOfRange { .. })
            ));
            assert!(matches!(
                state.counter(n),
                Err(RelayError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_missing_counter() {
        let xml = SAMPLE.replace("<count5>0</count5>", "");
        match decode(&xml) {
            Err(RelayError::Decode { field, .. }) => assert_eq!(field, "count5"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_counter() {
        let xml = SAMPLE.replace("<count2>0</count2>", "<count2>lots</count2>");
        assert!(matches!(decode(&xml), Err(RelayError::Decode { .. })));
    }
}
