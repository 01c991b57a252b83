use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SensorError;

pub const DEFAULT_AIR_VALUE: i32 = 500;
pub const DEFAULT_WATER_VALUE: i32 = 200;

pub const DEFAULT_PARAM_NAME: &str = "Soil Moisture";
pub const DEFAULT_PIN: u8 = 4;
pub const DEFAULT_ADC_VOLTAGE_MV: u32 = 3300;
pub const DEFAULT_ADC_RESOLUTION: u8 = 12;
pub const DEFAULT_AVERAGE_SIZE: usize = 10;

const MAX_ADC_RESOLUTION: u8 = 16;

/// The two reference points of the moisture mapping.
///
/// No ordering is enforced. Calibration expects the reading to rise with
/// moisture, but a stored pair with the opposite polarity maps just as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConfig {
    /// Reading when the probe is completely dry.
    pub air_value: i32,
    /// Reading when the probe is submerged.
    pub water_value: i32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            air_value: DEFAULT_AIR_VALUE,
            water_value: DEFAULT_WATER_VALUE,
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<(), SensorError> {
        if self.air_value == self.water_value {
            return Err(SensorError::configuration(format!(
                "air and water values are both {}",
                self.air_value
            )));
        }

        Ok(())
    }
}

/// Hardware parameters of the analog input the probe is wired to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogInputConfig {
    #[serde(rename = "ParamName")]
    pub param_name: String,
    #[serde(rename = "Pin")]
    pub pin: u8,
    #[serde(rename = "ADC_Voltage_mv")]
    pub adc_voltage_mv: u32,
    #[serde(rename = "ADC_Resolution")]
    pub adc_resolution: u8,
    #[serde(rename = "RollingAverage")]
    pub rolling_average: bool,
    #[serde(rename = "AverageSize")]
    pub average_size: usize,
}

impl Default for AnalogInputConfig {
    fn default() -> Self {
        Self {
            param_name: DEFAULT_PARAM_NAME.to_string(),
            pin: DEFAULT_PIN,
            adc_voltage_mv: DEFAULT_ADC_VOLTAGE_MV,
            adc_resolution: DEFAULT_ADC_RESOLUTION,
            rolling_average: false,
            average_size: DEFAULT_AVERAGE_SIZE,
        }
    }
}

impl AnalogInputConfig {
    pub fn validate(&self) -> Result<(), SensorError> {
        if self.param_name.is_empty() {
            return Err(SensorError::configuration("parameter name is empty"));
        }
        if self.adc_resolution == 0 || self.adc_resolution > MAX_ADC_RESOLUTION {
            return Err(SensorError::configuration(format!(
                "ADC resolution must be 1-{} bits, got {}",
                MAX_ADC_RESOLUTION, self.adc_resolution
            )));
        }
        if self.adc_voltage_mv == 0 {
            return Err(SensorError::configuration("ADC reference voltage is 0 mV"));
        }
        if self.average_size == 0 {
            return Err(SensorError::configuration("average size must be at least 1"));
        }

        Ok(())
    }

    /// Highest raw count the ADC can return at this resolution.
    pub fn full_scale(&self) -> u32 {
        (1u32 << self.adc_resolution) - 1
    }
}

/// The complete persisted document.
#[derive(Debug, Serialize)]
struct SoilMoistureDocument<'a> {
    #[serde(rename = "AirValue")]
    air_value: i32,
    #[serde(rename = "WaterValue")]
    water_value: i32,
    #[serde(flatten)]
    analog_input: &'a AnalogInputConfig,
}

pub fn to_json(calibration: &CalibrationConfig, analog_input: &AnalogInputConfig) -> String {
    let document = SoilMoistureDocument {
        air_value: calibration.air_value,
        water_value: calibration.water_value,
        analog_input,
    };

    // Plain integers, booleans and strings: serialization cannot fail.
    serde_json::to_string(&document).unwrap_or_default()
}

/// A parsed configuration text. Absent (or `null`) keys leave the current value untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigUpdate {
    #[serde(rename = "AirValue")]
    pub air_value: Option<i32>,
    #[serde(rename = "WaterValue")]
    pub water_value: Option<i32>,
    #[serde(rename = "ParamName")]
    pub param_name: Option<String>,
    #[serde(rename = "Pin")]
    pub pin: Option<u8>,
    #[serde(rename = "ADC_Voltage_mv")]
    pub adc_voltage_mv: Option<u32>,
    #[serde(rename = "ADC_Resolution")]
    pub adc_resolution: Option<u8>,
    #[serde(rename = "RollingAverage")]
    pub rolling_average: Option<bool>,
    #[serde(rename = "AverageSize")]
    pub average_size: Option<usize>,
}

impl ConfigUpdate {
    /// Parses a configuration text. Anything but a JSON object is refused, as is
    /// any known key holding a value of the wrong type.
    pub fn parse(text: &str) -> Result<Self, SensorError> {
        let value: Value = serde_json::from_str(text)?;

        if !value.is_object() {
            return Err(SensorError::Deserialization(serde::de::Error::custom(
                "configuration must be a JSON object",
            )));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Whether the update sets either reference point.
    pub fn touches_calibration(&self) -> bool {
        self.air_value.is_some() || self.water_value.is_some()
    }

    pub fn apply_calibration(&self, current: &CalibrationConfig) -> CalibrationConfig {
        CalibrationConfig {
            air_value: self.air_value.unwrap_or(current.air_value),
            water_value: self.water_value.unwrap_or(current.water_value),
        }
    }

    pub fn apply_analog_input(&self, current: &AnalogInputConfig) -> AnalogInputConfig {
        AnalogInputConfig {
            param_name: self
                .param_name
                .clone()
                .unwrap_or_else(|| current.param_name.clone()),
            pin: self.pin.unwrap_or(current.pin),
            adc_voltage_mv: self.adc_voltage_mv.unwrap_or(current.adc_voltage_mv),
            adc_resolution: self.adc_resolution.unwrap_or(current.adc_resolution),
            rolling_average: self.rolling_average.unwrap_or(current.rolling_average),
            average_size: self.average_size.unwrap_or(current.average_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serialize_with_every_key() {
        let json = to_json(&CalibrationConfig::default(), &AnalogInputConfig::default());
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["AirValue"], 500);
        assert_eq!(value["WaterValue"], 200);
        assert_eq!(value["ParamName"], "Soil Moisture");
        assert_eq!(value["Pin"], 4);
        assert_eq!(value["ADC_Voltage_mv"], 3300);
        assert_eq!(value["ADC_Resolution"], 12);
        assert_eq!(value["RollingAverage"], false);
        assert_eq!(value["AverageSize"], 10);
    }

    #[test]
    fn serialized_document_parses_back_to_the_same_values() {
        let calibration = CalibrationConfig {
            air_value: 2870,
            water_value: 1240,
        };
        let analog_input = AnalogInputConfig {
            param_name: "Bed 2".to_string(),
            pin: 2,
            adc_voltage_mv: 2450,
            adc_resolution: 12,
            rolling_average: true,
            average_size: 25,
        };

        let update = ConfigUpdate::parse(&to_json(&calibration, &analog_input)).unwrap();

        assert_eq!(
            update.apply_calibration(&CalibrationConfig::default()),
            calibration
        );
        assert_eq!(
            update.apply_analog_input(&AnalogInputConfig::default()),
            analog_input
        );
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let update = ConfigUpdate::parse(r#"{"WaterValue": 150, "RollingAverage": null}"#).unwrap();
        let current = CalibrationConfig {
            air_value: 480,
            water_value: 210,
        };

        assert_eq!(
            update.apply_calibration(&current),
            CalibrationConfig {
                air_value: 480,
                water_value: 150
            }
        );
        assert_eq!(
            update.apply_analog_input(&AnalogInputConfig::default()),
            AnalogInputConfig::default()
        );
    }

    #[test]
    fn only_reference_keys_touch_calibration() {
        assert!(!ConfigUpdate::parse(r#"{"RollingAverage": true}"#)
            .unwrap()
            .touches_calibration());
        assert!(!ConfigUpdate::parse(r#"{"AirValue": null}"#)
            .unwrap()
            .touches_calibration());
        assert!(ConfigUpdate::parse(r#"{"WaterValue": 180}"#)
            .unwrap()
            .touches_calibration());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let update = ConfigUpdate::parse(r#"{"AirValue": 510, "Firmware": "1.2"}"#).unwrap();
        assert_eq!(update.air_value, Some(510));
    }

    #[test]
    fn malformed_text_is_a_deserialization_error() {
        for text in ["", "{\"AirValue\": 500", "not json", "[500, 200]", "42"] {
            assert!(
                matches!(ConfigUpdate::parse(text), Err(SensorError::Deserialization(_))),
                "{text:?} should be refused"
            );
        }
    }

    #[test]
    fn type_mismatch_fails_fast() {
        for text in [
            r#"{"AirValue": "dry"}"#,
            r#"{"WaterValue": 12.5}"#,
            r#"{"Pin": 300}"#,
            r#"{"RollingAverage": 1}"#,
            r#"{"AverageSize": -3}"#,
        ] {
            assert!(
                matches!(ConfigUpdate::parse(text), Err(SensorError::Deserialization(_))),
                "{text:?} should be refused"
            );
        }
    }

    #[test]
    fn identical_reference_points_are_rejected() {
        let calibration = CalibrationConfig {
            air_value: 300,
            water_value: 300,
        };
        assert!(matches!(
            calibration.validate(),
            Err(SensorError::Configuration(_))
        ));
        assert!(CalibrationConfig::default().validate().is_ok());
    }

    #[test]
    fn analog_input_bounds() {
        assert!(AnalogInputConfig::default().validate().is_ok());

        let invalid = [
            AnalogInputConfig {
                adc_resolution: 0,
                ..Default::default()
            },
            AnalogInputConfig {
                adc_resolution: 17,
                ..Default::default()
            },
            AnalogInputConfig {
                adc_voltage_mv: 0,
                ..Default::default()
            },
            AnalogInputConfig {
                average_size: 0,
                ..Default::default()
            },
            AnalogInputConfig {
                param_name: String::new(),
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(
                matches!(config.validate(), Err(SensorError::Configuration(_))),
                "{config:?} should be invalid"
            );
        }
    }

    #[test]
    fn full_scale_follows_resolution() {
        assert_eq!(AnalogInputConfig::default().full_scale(), 4095);
        let ten_bits = AnalogInputConfig {
            adc_resolution: 10,
            ..Default::default()
        };
        assert_eq!(ten_bits.full_scale(), 1023);
    }
}
