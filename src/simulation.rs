//! Host demo: a noisy probe moved from air into water and back, driven
//! through the same calls the firmware makes.

use rand::prelude::*;

use crate::{
    clock::ThreadClock,
    configuration::{storage::FileStorage, DEFAULT_CONFIG_FILE},
    logging::{EventSink, SensorEvent},
    sensors::{
        analog_input::{AdcChannel, AnalogInput},
        moisture_sensor::MoistureSensor,
        sensor::Sensor,
    },
};

/// Probe readings in open air and in water, as seen on a 12-bit ADC. The
/// reading rises with moisture.
pub const DRY_READING: u16 = 1240;
pub const WET_READING: u16 = 2870;
const NOISE: i32 = 25;

/// Simulated analog output with uniform noise around a settable level.
pub struct SimulatedProbe {
    level: u16,
    rng: ThreadRng,
}

impl SimulatedProbe {
    pub fn new(level: u16) -> Self {
        Self {
            level,
            rng: thread_rng(),
        }
    }

    pub fn set_level(&mut self, level: u16) {
        self.level = level;
    }
}

impl AdcChannel for SimulatedProbe {
    fn read_raw(&mut self) -> u16 {
        let noise = self.rng.gen_range(-NOISE..=NOISE);
        (self.level as i32 + noise).clamp(0, u16::MAX as i32) as u16
    }
}

/// Prints events to stdout, there is no logger installed on the host.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: SensorEvent) {
        println!("[{}] {}", event.level(), event);
    }
}

type SimulatedSensor =
    MoistureSensor<AnalogInput<SimulatedProbe>, FileStorage, ThreadClock, ConsoleSink>;

pub fn run() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join("df-soil-moisture");
    println!("Settings stored below {}", root.display());

    let mut sensor: SimulatedSensor = MoistureSensor::new(
        DEFAULT_CONFIG_FILE,
        AnalogInput::new(SimulatedProbe::new(DRY_READING)),
        FileStorage::new(root),
        ThreadClock,
        ConsoleSink,
    );

    sensor.begin()?;
    println!("Configuration: {}", sensor.get_config());

    println!("{}", sensor.calibrate(0));
    println!("{}", sensor.calibrate(1));
    probe(&mut sensor).set_level(WET_READING);
    println!("{}", sensor.calibrate(2));
    println!("Configuration: {}", sensor.get_config());

    sensor.set_config(r#"{"RollingAverage": true, "AverageSize": 5}"#, false)?;

    let steps = 8;
    for i in 0..=steps {
        let level = DRY_READING + (WET_READING - DRY_READING) * i / steps;
        probe(&mut sensor).set_level(level);
        sensor.take_measurement()?;
        println!("{}", sensor.pretty_print());
    }

    Ok(())
}

fn probe(sensor: &mut SimulatedSensor) -> &mut SimulatedProbe {
    sensor.sampling_source_mut().channel_mut()
}
