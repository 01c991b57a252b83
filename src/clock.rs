use std::time::Duration;

/// Blocking pause used between calibration samples.
pub trait SamplingClock {
    fn delay_ms(&mut self, ms: u32);
}

/// Sleeps the current thread. Used by host builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadClock;

impl SamplingClock for ThreadClock {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

#[cfg(target_os = "espidf")]
pub use esp::FreeRtosClock;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::FreeRtos;

    /// Yields to the scheduler for the requested number of milliseconds.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FreeRtosClock;

    impl super::SamplingClock for FreeRtosClock {
        fn delay_ms(&mut self, ms: u32) {
            FreeRtos::delay_ms(ms);
        }
    }
}
