use std::borrow::Borrow;

use esp_idf_svc::hal::{
    adc::{
        attenuation,
        oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver},
        Adc,
    },
    gpio::ADCPin,
};

use super::analog_input::AdcChannel;

/// One-shot ADC channel with 11 dB attenuation, so the probe's full 0-3.3 V
/// swing stays in range.
pub struct EspAdcChannel<'a, ADC, APin, M>
where
    ADC: Adc + 'a,
    APin: ADCPin<Adc = ADC>,
    M: Borrow<AdcDriver<'a, ADC>>,
{
    channel: AdcChannelDriver<'a, APin, M>,
}

impl<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>>
    EspAdcChannel<'a, ADC, APin, M>
{
    pub fn new(adc_driver: M, pin_adc: APin) -> anyhow::Result<Self> {
        Ok(Self {
            channel: AdcChannelDriver::new(
                adc_driver,
                pin_adc,
                &AdcChannelConfig {
                    attenuation: attenuation::DB_11,
                    calibration: true,
                    ..Default::default()
                },
            )?,
        })
    }
}

impl<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>> AdcChannel
    for EspAdcChannel<'a, ADC, APin, M>
{
    fn read_raw(&mut self) -> u16 {
        self.channel.read_raw().unwrap_or(0)
    }
}
