#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(all(not(target_os = "espidf"), feature = "simulate"))]
fn main() -> anyhow::Result<()> {
    df_soil_moisture::simulation::run()
}

#[cfg(all(not(target_os = "espidf"), not(feature = "simulate")))]
fn main() -> anyhow::Result<()> {
    println!("Built for the host without the `simulate` feature: nothing to run.");
    println!("Flash with `--target riscv32imc-esp-espidf`, or try `--features simulate`.");
    Ok(())
}

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::{delay::FreeRtos, peripherals::Peripherals};
    use log::{error, info, warn};

    use df_soil_moisture::{
        board::Board,
        configuration::{flash_storage::SettingsPartition, DEFAULT_CONFIG_FILE},
        sensors::{calibration::CalibrationResponse, sensor::Sensor},
    };

    const POLL_INTERVAL_MS: u32 = 20;
    const MEASUREMENT_INTERVAL_MS: u32 = 10_000;

    pub fn run() -> anyhow::Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();

        let peripherals = Peripherals::take()?;
        let partition = SettingsPartition::mount()?;

        let mut board = Board::new(
            DEFAULT_CONFIG_FILE,
            peripherals.adc1,
            peripherals.pins,
            partition.storage(),
        )?;

        if let Err(e) = board.moisture_sensor.begin() {
            error!("Soil moisture sensor didn't start: {}", e);
        }
        info!("Configuration: {}", board.moisture_sensor.get_config());

        let mut calibration_step = 0;
        let mut since_measurement = MEASUREMENT_INTERVAL_MS;

        loop {
            if board.buttons.settings_pressed() {
                board.leds.green.set_low()?;
                board.leds.orange.set_high()?;

                let response = board.moisture_sensor.calibrate(calibration_step);
                info!("Calibration step {}: {}", calibration_step, response);

                calibration_step = match response {
                    CalibrationResponse::Next(_) => calibration_step + 1,
                    CalibrationResponse::Done(_) => {
                        board.leds.orange.set_low()?;
                        board.leds.green.set_high()?;
                        0
                    }
                    CalibrationResponse::Error(_) => {
                        board.leds.orange.set_low()?;
                        0
                    }
                };

                while board.buttons.settings_pressed() {
                    FreeRtos::delay_ms(POLL_INTERVAL_MS);
                }
            }

            if since_measurement >= MEASUREMENT_INTERVAL_MS {
                since_measurement = 0;

                match board.moisture_sensor.take_measurement() {
                    Ok(()) => {
                        info!("{}", board.moisture_sensor.pretty_print());
                        info!("{}", board.generate_json());
                    }
                    Err(e) => warn!("Skipping measurement: {}", e),
                }
            }

            FreeRtos::delay_ms(POLL_INTERVAL_MS);
            since_measurement += POLL_INTERVAL_MS;
        }
    }
}
