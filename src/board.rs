use esp_idf_svc::hal::{
    adc::{oneshot::AdcDriver, ADC1},
    gpio::*,
};
use serde_json::{json, Map, Value};

use crate::{
    clock::FreeRtosClock,
    configuration::storage::FileStorage,
    logging::LogSink,
    sensors::{
        analog_input::AnalogInput, esp_adc::EspAdcChannel, moisture_sensor::MoistureSensor,
        sensor::Sensor,
    },
};

pub type ProbeInput<'a> = AnalogInput<EspAdcChannel<'a, ADC1, Gpio4, AdcDriver<'a, ADC1>>>;

pub type BoardMoistureSensor<'a> = MoistureSensor<ProbeInput<'a>, FileStorage, FreeRtosClock, LogSink>;

pub struct Buttons<'a> {
    pub settings: PinDriver<'a, Gpio5, Input>,
}

impl<'a> Buttons<'a> {
    /// The button pulls the line low.
    pub fn settings_pressed(&self) -> bool {
        self.settings.is_low()
    }
}

pub struct OnBoardLed<'a> {
    pub orange: PinDriver<'a, Gpio6, Output>,
    pub green: PinDriver<'a, Gpio7, Output>,
}

pub struct Board<'a> {
    pub moisture_sensor: BoardMoistureSensor<'a>,
    pub buttons: Buttons<'a>,
    pub leds: OnBoardLed<'a>,
}

impl<'a> Board<'a> {
    pub fn new(
        config_file: &str,
        adc_1: ADC1,
        pins: Pins,
        storage: FileStorage,
    ) -> anyhow::Result<Self> {
        let probe = EspAdcChannel::new(AdcDriver::new(adc_1)?, pins.gpio4)?;

        let mut s = Self {
            moisture_sensor: MoistureSensor::new(
                config_file,
                AnalogInput::new(probe),
                storage,
                FreeRtosClock,
                LogSink,
            ),
            buttons: Buttons {
                settings: PinDriver::input(pins.gpio5)?,
            },
            leds: OnBoardLed {
                orange: PinDriver::output(pins.gpio6)?,
                green: PinDriver::output(pins.gpio7)?,
            },
        };

        s.buttons.settings.set_pull(Pull::Up)?;
        s.leds.orange.set_low()?;
        s.leds.green.set_low()?;
        Ok(s)
    }

    pub fn generate_json(&self) -> String {
        let mut sensors = Map::new();
        self.moisture_sensor.add_json_value(&mut sensors);

        json!({
            "name": self.moisture_sensor.description().name,
            "id": self.moisture_sensor.description().id,
            "sensors": Value::Object(sensors)
        })
        .to_string()
    }
}
