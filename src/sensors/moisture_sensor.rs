use serde_json::{json, Map, Value};

use crate::clock::SamplingClock;
use crate::configuration::make_config_path;
use crate::configuration::sensor_configuration::{
    to_json, AnalogInputConfig, CalibrationConfig, ConfigUpdate,
};
use crate::configuration::storage::Storage;
use crate::error::SensorError;
use crate::logging::{EventSink, SensorEvent};

use super::analog_input::SamplingSource;
use super::calibration::{
    capture, CalibrationResponse, CalibrationStep, Extreme, CALIBRATION_COMPLETE, PROMPT_DRY,
    PROMPT_SUBMERGE, SAVE_FAILED,
};
use super::normalizer::normalize_with;
use super::sensor::{Sensor, SensorDescription};

pub const SENSOR_ID: u32 = 2;
pub const SENSOR_TYPE: &str = "Environmental Sensor";
pub const SENSOR_NAME: &str = "Soil Moisture Sensor";
pub const MOISTURE_UNIT: &str = "%Moisture";
pub const RAW_PARAMETER: &str = "Raw Value";
pub const RAW_UNIT: &str = "ADC";

/// Index of each channel in [`MoistureSensor::values`].
pub const MOISTURE_CHANNEL: usize = 0;
pub const RAW_CHANNEL: usize = 1;
const CHANNEL_COUNT: usize = 2;

/// Resistive soil-moisture probe on an analog input.
///
/// Owns its calibration and the file it is persisted to. Sampling, storage,
/// delays and logging are injected, so the same driver runs on the board and
/// against the doubles in [`crate::mock`].
pub struct MoistureSensor<S, T, C, L> {
    path: String,
    calibration: CalibrationConfig,
    source: S,
    storage: T,
    clock: C,
    events: L,
    description: SensorDescription,
    values: Vec<f32>,
}

impl<S, T, C, L> MoistureSensor<S, T, C, L>
where
    S: SamplingSource,
    T: Storage,
    C: SamplingClock,
    L: EventSink,
{
    /// `config_file` is a bare file name, stored under `/settings/sen/`.
    pub fn new(config_file: &str, source: S, storage: T, clock: C, events: L) -> Self {
        Self {
            path: make_config_path(config_file),
            calibration: CalibrationConfig::default(),
            source,
            storage,
            clock,
            events,
            description: SensorDescription::default(),
            values: Vec::with_capacity(CHANNEL_COUNT),
        }
    }

    /// Loads the stored configuration, or writes the defaults on first start.
    pub fn begin(&mut self) -> Result<(), SensorError> {
        self.values.clear();
        self.values.resize(CHANNEL_COUNT, 0.0);

        if !self.storage.check_config(&self.path) {
            self.calibration = CalibrationConfig::default();
            if self.source.parameters() != &AnalogInputConfig::default() {
                self.source.configure_input(AnalogInputConfig::default())?;
            }
            self.save()?;
            self.emit(SensorEvent::DefaultsWritten {
                path: self.path.clone(),
            });
        } else {
            let stored = match self.storage.read_file(&self.path) {
                Ok(stored) => stored,
                Err(e) => {
                    self.emit(SensorEvent::ConfigReadFailed {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    });
                    return Err(e);
                }
            };
            self.set_config(&stored, false)?;
            self.emit(SensorEvent::ConfigLoaded {
                path: self.path.clone(),
            });
        }

        self.refresh_description();
        Ok(())
    }

    /// Samples once and recomputes `[moisture %, raw]`.
    ///
    /// Whether the sample is averaged is read from the input parameters on
    /// every call, so a configuration change applies on the next cycle.
    pub fn take_measurement(&mut self) -> Result<(), SensorError> {
        let raw = self.source.read();

        let percent = match normalize_with(raw, &self.calibration) {
            Ok(percent) => percent,
            Err(e) => {
                self.emit(SensorEvent::MeasurementFailed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        self.values.clear();
        self.values.extend([percent as f32, raw as f32]);
        Ok(())
    }

    pub fn get_config(&self) -> String {
        to_json(&self.calibration, self.source.parameters())
    }

    /// Applies a JSON configuration text, all of it or nothing.
    ///
    /// Keys that are present overwrite the current values. With `persist` the
    /// merged configuration is also written to storage; callers composing a
    /// larger update pass `false` and save once at the end.
    pub fn set_config(&mut self, config: &str, persist: bool) -> Result<(), SensorError> {
        let update = match ConfigUpdate::parse(config) {
            Ok(update) => update,
            Err(e) => {
                self.emit(SensorEvent::DeserializationFailed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        // Reference points only need checking when the update moves them.
        let calibration = update.apply_calibration(&self.calibration);
        if update.touches_calibration() {
            if let Err(e) = calibration.validate() {
                self.emit(SensorEvent::ConfigRejected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        }

        let analog_input = update.apply_analog_input(self.source.parameters());
        if &analog_input != self.source.parameters() {
            if let Err(e) = self.source.configure_input(analog_input) {
                self.emit(SensorEvent::ConfigRejected {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        }

        self.calibration = calibration;
        self.refresh_description();

        if persist {
            self.save()?;
        }
        Ok(())
    }

    /// Runs one step of the two-point calibration.
    pub fn calibrate(&mut self, step: i32) -> CalibrationResponse {
        let step = match CalibrationStep::try_from(step) {
            Ok(step) => step,
            Err(unknown) => {
                let message = format!("No such calibration step: {}", unknown);
                self.emit(SensorEvent::CalibrationFailed {
                    step: unknown,
                    reason: message.clone(),
                });
                return CalibrationResponse::Error(message);
            }
        };

        match step {
            CalibrationStep::Prompt => {
                self.emit(SensorEvent::CalibrationPrompt {
                    step: step.number(),
                    message: PROMPT_DRY.to_string(),
                });
                CalibrationResponse::Next(PROMPT_DRY.to_string())
            }
            CalibrationStep::CaptureAir => {
                let air_value = capture(&mut self.source, &mut self.clock, Extreme::Minimum);
                self.calibration.air_value = air_value;
                self.emit(SensorEvent::AirCaptured { value: air_value });
                self.emit(SensorEvent::CalibrationPrompt {
                    step: step.number(),
                    message: PROMPT_SUBMERGE.to_string(),
                });
                CalibrationResponse::Next(PROMPT_SUBMERGE.to_string())
            }
            CalibrationStep::CaptureWater => {
                let water_value = capture(&mut self.source, &mut self.clock, Extreme::Maximum);

                // Would leave a configuration that can't be loaded back.
                if water_value == self.calibration.air_value {
                    let message = format!(
                        "Water reading {} equals the air reading, check the probe",
                        water_value
                    );
                    self.emit(SensorEvent::CalibrationFailed {
                        step: step.number(),
                        reason: message.clone(),
                    });
                    return CalibrationResponse::Error(message);
                }

                self.calibration.water_value = water_value;
                self.emit(SensorEvent::WaterCaptured { value: water_value });

                // The new water value stays in memory even if the save fails;
                // the operator retries the save, not the sampling.
                match self.save() {
                    Ok(()) => CalibrationResponse::Done(CALIBRATION_COMPLETE.to_string()),
                    Err(e) => {
                        self.emit(SensorEvent::CalibrationFailed {
                            step: step.number(),
                            reason: e.to_string(),
                        });
                        CalibrationResponse::Error(SAVE_FAILED.to_string())
                    }
                }
            }
        }
    }

    /// Writes the current configuration to the sensor's file.
    ///
    /// Refuses to write reference points that `begin()` could not load back.
    pub fn save(&mut self) -> Result<(), SensorError> {
        if let Err(e) = self.calibration.validate() {
            self.emit(SensorEvent::ConfigRejected {
                reason: e.to_string(),
            });
            return Err(e);
        }

        let contents = self.get_config();

        match self.storage.save_config(&self.path, &contents) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.emit(SensorEvent::PersistenceFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn description(&self) -> &SensorDescription {
        &self.description
    }

    pub fn sampling_source(&self) -> &S {
        &self.source
    }

    pub fn sampling_source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn storage(&self) -> &T {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut T {
        &mut self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn events(&self) -> &L {
        &self.events
    }

    fn emit(&mut self, event: SensorEvent) {
        self.events.emit(event);
    }

    fn refresh_description(&mut self) {
        self.description = SensorDescription {
            id: SENSOR_ID,
            sensor_type: SENSOR_TYPE.to_string(),
            name: SENSOR_NAME.to_string(),
            parameter_quantity: CHANNEL_COUNT,
            parameters: vec![
                self.source.parameters().param_name.clone(),
                RAW_PARAMETER.to_string(),
            ],
            units: vec![MOISTURE_UNIT.to_string(), RAW_UNIT.to_string()],
        };
    }
}

impl<S, T, C, L> Sensor for MoistureSensor<S, T, C, L>
where
    S: SamplingSource,
    T: Storage,
    C: SamplingClock,
    L: EventSink,
{
    fn begin(&mut self) -> bool {
        MoistureSensor::begin(self).is_ok()
    }

    fn take_measurement(&mut self) -> bool {
        MoistureSensor::take_measurement(self).is_ok()
    }

    fn values(&self) -> &[f32] {
        MoistureSensor::values(self)
    }

    fn description(&self) -> &SensorDescription {
        MoistureSensor::description(self)
    }

    fn get_config(&self) -> String {
        MoistureSensor::get_config(self)
    }

    fn set_config(&mut self, config: &str, persist: bool) -> bool {
        MoistureSensor::set_config(self, config, persist).is_ok()
    }

    fn calibrate(&mut self, step: i32) -> CalibrationResponse {
        MoistureSensor::calibrate(self, step)
    }

    fn add_json_value(&self, map: &mut Map<String, Value>) {
        map.insert(
            "moisture".to_string(),
            json!(self.values.get(MOISTURE_CHANNEL)),
        );
        map.insert("raw".to_string(), json!(self.values.get(RAW_CHANNEL)));
    }

    fn pretty_print(&self) -> String {
        let percent = self.values.get(MOISTURE_CHANNEL).copied().unwrap_or(0.0);
        let raw = self.values.get(RAW_CHANNEL).copied().unwrap_or(0.0);

        format!(
            "Soil moisture: {}% (raw value: {}, {} mV)",
            percent,
            raw,
            self.source.to_millivolts(raw as i32)
        )
    }
}
