//! Relay module with analog inputs and sensor channels
//!
//! # State document
//!
//! ```xml
//! <datavalues>
//!   <relay1state>1</relay1state> ... <relay4state>0</relay4state>
//!   <input1state>0</input1state> ... <input4state>0</input4state>
//!   <count1>0</count1> ... <count4>0</count4>
//!   <analogInput1>1.25</analogInput1> ... <analogInput4>0.00</analogInput4>
//!   <sensor1>72.5</sensor1> ... <sensor6>x.x</sensor6>
//!   <powerupflag>0</powerupflag>
//! </datavalues>
//! ```
//!
//! Sensor channels with nothing attached report `x.x` and decode to `None`.

use crate::channel;
use crate::level::Level;
use netrelay_codec::{Fields, RelayControl, StateDecoder};
use netrelay_core::{RelayError, RelayResult};
use roxmltree::Node;
use serde::Serialize;

pub const RELAY_COUNT: usize = 4;
pub const INPUT_COUNT: usize = 4;
pub const ANALOG_INPUT_COUNT: usize = 4;
pub const SENSOR_COUNT: usize = 6;

/// Snapshot of a sensor/relay module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorRelayState {
    relays: Vec<Level>,
    inputs: Vec<Level>,
    counters: Vec<u32>,
    analog_inputs: Vec<f64>,
    sensors: Vec<Option<f64>>,
    power_up: bool,
}

impl SensorRelayState {
    pub fn relay(&self, n: usize) -> RelayResult<Level> {
        channel("relay", &self.relays, n)
    }

    pub fn input(&self, n: usize) -> RelayResult<Level> {
        channel("input", &self.inputs, n)
    }

    pub fn counter(&self, n: usize) -> RelayResult<u32> {
        channel("counter", &self.counters, n)
    }

    /// Analog input `n` in volts
    pub fn analog_input(&self, n: usize) -> RelayResult<f64> {
        channel("analog input", &self.analog_inputs, n)
    }

    /// Sensor `n`, `None` when no sensor is attached
    pub fn sensor(&self, n: usize) -> RelayResult<Option<f64>> {
        channel("sensor", &self.sensors, n)
    }

    pub fn relays(&self) -> &[Level] {
        &self.relays
    }

    pub fn sensors(&self) -> &[Option<f64>] {
        &self.sensors
    }

    pub fn power_up_flag(&self) -> bool {
        self.power_up
    }
}

/// Decoder for the sensor/relay module
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorRelayModule;

impl StateDecoder for SensorRelayModule {
    type State = SensorRelayState;

    fn family(&self) -> &'static str {
        "sensor-relay"
    }

    fn input_count(&self) -> usize {
        INPUT_COUNT
    }

    fn decode(&self, root: Node<'_, '_>) -> RelayResult<SensorRelayState> {
        let fields = Fields::new(root);
        Ok(SensorRelayState {
            relays: fields.indexed("relay", "state", RELAY_COUNT, Level::read)?,
            inputs: fields.indexed("input", "state", INPUT_COUNT, Level::read)?,
            counters: fields.indexed("count", "", INPUT_COUNT, |f, name| f.number(name))?,
            analog_inputs: fields.indexed("analogInput", "", ANALOG_INPUT_COUNT, |f, name| {
                let value: f64 = f.number(name)?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(RelayError::decode(name, "value is not finite"))
                }
            })?,
            sensors: fields.indexed("sensor", "", SENSOR_COUNT, |f, name| {
                f.optional_number(name)
            })?,
            power_up: fields.flag("powerupflag")?,
        })
    }
}

impl RelayControl for SensorRelayModule {
    fn relay_count(&self) -> usize {
        RELAY_COUNT
    }
}
