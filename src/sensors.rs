pub mod analog_input;
pub mod calibration;
pub mod moisture_sensor;
pub mod normalizer;
pub mod sensor;

#[cfg(target_os = "espidf")]
pub mod esp_adc;
