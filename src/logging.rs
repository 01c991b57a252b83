//! Structured events emitted by the driver.
//!
//! The driver never calls the `log` macros itself. It hands a [`SensorEvent`]
//! to the [`EventSink`] it was built with; [`LogSink`] is the sink used on the
//! device and simply forwards to the `log` facade.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    ConfigLoaded { path: String },
    DefaultsWritten { path: String },
    DeserializationFailed { reason: String },
    ConfigRejected { reason: String },
    PersistenceFailed { path: String, reason: String },
    ConfigReadFailed { path: String, reason: String },
    CalibrationPrompt { step: i32, message: String },
    AirCaptured { value: i32 },
    WaterCaptured { value: i32 },
    CalibrationFailed { step: i32, reason: String },
    MeasurementFailed { reason: String },
}

impl SensorEvent {
    pub fn level(&self) -> log::Level {
        match self {
            SensorEvent::ConfigLoaded { .. }
            | SensorEvent::DefaultsWritten { .. }
            | SensorEvent::CalibrationPrompt { .. }
            | SensorEvent::AirCaptured { .. }
            | SensorEvent::WaterCaptured { .. } => log::Level::Info,
            SensorEvent::ConfigRejected { .. }
            | SensorEvent::CalibrationFailed { .. }
            | SensorEvent::MeasurementFailed { .. } => log::Level::Warn,
            SensorEvent::DeserializationFailed { .. }
            | SensorEvent::PersistenceFailed { .. }
            | SensorEvent::ConfigReadFailed { .. } => log::Level::Error,
        }
    }
}

impl fmt::Display for SensorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorEvent::ConfigLoaded { path } => write!(f, "Configuration loaded from {}", path),
            SensorEvent::DefaultsWritten { path } => {
                write!(f, "No configuration found, defaults written to {}", path)
            }
            SensorEvent::DeserializationFailed { reason } => {
                write!(f, "Deserialization failed: {}", reason)
            }
            SensorEvent::ConfigRejected { reason } => {
                write!(f, "Configuration rejected: {}", reason)
            }
            SensorEvent::PersistenceFailed { path, reason } => {
                write!(f, "Couldn't save {}: {}", path, reason)
            }
            SensorEvent::ConfigReadFailed { path, reason } => {
                write!(f, "Couldn't read {}: {}", path, reason)
            }
            SensorEvent::CalibrationPrompt { step, message } => {
                write!(f, "Calibration step {}: {}", step, message)
            }
            SensorEvent::AirCaptured { value } => write!(f, "Air value captured: {}", value),
            SensorEvent::WaterCaptured { value } => write!(f, "Water value captured: {}", value),
            SensorEvent::CalibrationFailed { step, reason } => {
                write!(f, "Calibration step {} failed: {}", step, reason)
            }
            SensorEvent::MeasurementFailed { reason } => {
                write!(f, "Measurement failed: {}", reason)
            }
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: SensorEvent);
}

/// Forwards every event to the `log` facade under the `df_soil_moisture` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: SensorEvent) {
        log::log!(target: "df_soil_moisture", event.level(), "{}", event);
    }
}
