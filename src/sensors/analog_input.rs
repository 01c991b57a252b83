use std::collections::VecDeque;

use crate::configuration::sensor_configuration::AnalogInputConfig;
use crate::error::SensorError;

/// A single ADC channel. Reads never fail: a broken conversion reads as 0.
pub trait AdcChannel {
    fn read_raw(&mut self) -> u16;
}

/// Where the driver gets its readings from.
pub trait SamplingSource {
    /// One instantaneous conversion.
    fn read_raw(&mut self) -> i32;

    /// A new conversion folded into the rolling window, returning the window mean.
    fn read_averaged(&mut self) -> i32;

    fn parameters(&self) -> &AnalogInputConfig;

    /// Validates and applies new hardware parameters. Nothing changes on error.
    fn configure_input(&mut self, parameters: AnalogInputConfig) -> Result<(), SensorError>;

    /// Averaged or instantaneous, decided by the parameters in force right now.
    fn read(&mut self) -> i32 {
        if self.parameters().rolling_average {
            self.read_averaged()
        } else {
            self.read_raw()
        }
    }

    fn to_millivolts(&self, raw: i32) -> i32 {
        let parameters = self.parameters();
        let full_scale = parameters.full_scale().max(1) as i64;
        (raw as i64 * parameters.adc_voltage_mv as i64 / full_scale) as i32
    }
}

/// Generic analog input: an [`AdcChannel`] plus its hardware parameters and rolling window.
pub struct AnalogInput<C: AdcChannel> {
    channel: C,
    parameters: AnalogInputConfig,
    window: VecDeque<i32>,
}

impl<C: AdcChannel> AnalogInput<C> {
    pub fn new(channel: C) -> Self {
        let parameters = AnalogInputConfig::default();
        Self {
            channel,
            window: VecDeque::with_capacity(parameters.average_size),
            parameters,
        }
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

impl<C: AdcChannel> SamplingSource for AnalogInput<C> {
    fn read_raw(&mut self) -> i32 {
        self.channel.read_raw() as i32
    }

    fn read_averaged(&mut self) -> i32 {
        let sample = self.read_raw();

        self.window.push_back(sample);
        while self.window.len() > self.parameters.average_size {
            self.window.pop_front();
        }

        let sum: i64 = self.window.iter().map(|&v| v as i64).sum();
        (sum / self.window.len() as i64) as i32
    }

    fn parameters(&self) -> &AnalogInputConfig {
        &self.parameters
    }

    fn configure_input(&mut self, parameters: AnalogInputConfig) -> Result<(), SensorError> {
        parameters.validate()?;

        // Samples taken under another window size or resolution don't mix.
        if parameters.average_size != self.parameters.average_size
            || parameters.adc_resolution != self.parameters.adc_resolution
            || parameters.pin != self.parameters.pin
        {
            self.window.clear();
        }

        self.parameters = parameters;
        Ok(())
    }
}
