//! Test doubles for the driver's collaborators.
//!
//! Available in test builds and with the `mock` feature. Every double records
//! what was asked of it so tests can assert on it after handing it to a
//! [`MoistureSensor`](crate::sensors::moisture_sensor::MoistureSensor).

#![cfg(any(test, feature = "mock"))]

use std::collections::{HashMap, VecDeque};
use std::io;

use crate::clock::SamplingClock;
use crate::configuration::sensor_configuration::AnalogInputConfig;
use crate::configuration::storage::Storage;
use crate::error::SensorError;
use crate::logging::{EventSink, SensorEvent};
use crate::sensors::analog_input::SamplingSource;

/// Replays a scripted sequence of readings. Once the script runs dry the last
/// value repeats.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<i32>,
    last: i32,
    parameters: AnalogInputConfig,
    raw_reads: usize,
    averaged_reads: usize,
}

impl ScriptedSource {
    pub fn new(values: &[i32]) -> Self {
        let mut source = Self::default();
        source.script(values);
        source
    }

    /// Appends readings to the script.
    pub fn script(&mut self, values: &[i32]) {
        self.script.extend(values.iter().copied());
    }

    pub fn raw_reads(&self) -> usize {
        self.raw_reads
    }

    pub fn averaged_reads(&self) -> usize {
        self.averaged_reads
    }

    fn next_value(&mut self) -> i32 {
        if let Some(value) = self.script.pop_front() {
            self.last = value;
        }
        self.last
    }
}

impl SamplingSource for ScriptedSource {
    fn read_raw(&mut self) -> i32 {
        self.raw_reads += 1;
        self.next_value()
    }

    fn read_averaged(&mut self) -> i32 {
        self.averaged_reads += 1;
        self.next_value()
    }

    fn parameters(&self) -> &AnalogInputConfig {
        &self.parameters
    }

    fn configure_input(&mut self, parameters: AnalogInputConfig) -> Result<(), SensorError> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }
}

/// In-memory files with write-failure injection.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    /// Makes every following `read_file` fail until switched off again.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes every following `save_config` fail until switched off again.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn check_config(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_file(&self, path: &str) -> Result<String, SensorError> {
        if self.fail_reads {
            return Err(SensorError::persistence(
                path,
                io::Error::new(io::ErrorKind::Other, "injected read failure"),
            ));
        }

        self.files.get(path).cloned().ok_or_else(|| {
            SensorError::persistence(path, io::Error::new(io::ErrorKind::NotFound, "no such file"))
        })
    }

    fn save_config(&mut self, path: &str, contents: &str) -> Result<(), SensorError> {
        if self.fail_writes {
            return Err(SensorError::persistence(
                path,
                io::Error::new(io::ErrorKind::Other, "injected write failure"),
            ));
        }

        self.files.insert(path.to_string(), contents.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Counts requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    delays: usize,
    elapsed_ms: u64,
}

impl ManualClock {
    pub fn delays(&self) -> usize {
        self.delays
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

impl SamplingClock for ManualClock {
    fn delay_ms(&mut self, ms: u32) {
        self.delays += 1;
        self.elapsed_ms += ms as u64;
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SensorEvent>,
}

impl RecordingSink {
    pub fn events(&self) -> &[SensorEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: SensorEvent) {
        self.events.push(event);
    }
}
