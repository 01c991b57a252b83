//! Driver for the DFRobot analog soil-moisture probe on an ESP32 analog input.
//!
//! [`sensors::moisture_sensor::MoistureSensor`] turns raw ADC counts into a
//! moisture percentage, walks the operator through a two-point calibration and
//! keeps its configuration as JSON on the settings partition.

pub mod clock;
pub mod configuration;
pub mod error;
pub mod logging;
pub mod mock;
pub mod sensors;

#[cfg(target_os = "espidf")]
pub mod board;

#[cfg(feature = "simulate")]
pub mod simulation;
