use serde_json::{Map, Value};

use super::calibration::CalibrationResponse;

/// What a sensor measures, as shown by the host framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorDescription {
    pub id: u32,
    pub sensor_type: String,
    pub name: String,
    pub parameter_quantity: usize,
    pub parameters: Vec<String>,
    pub units: Vec<String>,
}

/// Surface the host framework drives. Failures are already logged by the
/// sensor and only come back as `false` or a calibration error response.
pub trait Sensor {
    fn begin(&mut self) -> bool;

    /// Samples once and refreshes [`Sensor::values`].
    fn take_measurement(&mut self) -> bool;

    fn values(&self) -> &[f32];

    fn description(&self) -> &SensorDescription;

    fn get_config(&self) -> String;

    fn set_config(&mut self, config: &str, persist: bool) -> bool;

    fn calibrate(&mut self, step: i32) -> CalibrationResponse;

    fn add_json_value(&self, map: &mut Map<String, Value>);

    fn pretty_print(&self) -> String;
}
