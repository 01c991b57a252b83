//! Two-point calibration procedure.
//!
//! The operator walks the probe through three steps, one call each:
//!
//! | Step | State          | Samples | Effect                                |
//! |------|----------------|---------|---------------------------------------|
//! | 0    | `Prompt`       | none    | asks for a dry probe                  |
//! | 1    | `CaptureAir`   | 10, min | sets the air value (not yet saved)    |
//! | 2    | `CaptureWater` | 10, max | sets the water value, saves config    |
//!
//! Steps cannot be reordered and there is no loop-back: redoing a
//! calibration means starting over at step 0.

use std::fmt;

use crate::clock::SamplingClock;

use super::analog_input::SamplingSource;

pub const CALIBRATION_SAMPLES: usize = 10;
pub const SETTLING_DELAY_MS: u32 = 50;

pub const PROMPT_DRY: &str = "Make sure the probe is completely dry, then continue";
pub const PROMPT_SUBMERGE: &str =
    "Submerge the probe in water up to the marked line, then continue";
pub const CALIBRATION_COMPLETE: &str = "Calibration complete";
pub const SAVE_FAILED: &str = "Couldn't save new configuration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    Prompt,
    CaptureAir,
    CaptureWater,
}

impl TryFrom<i32> for CalibrationStep {
    type Error = i32;

    fn try_from(step: i32) -> Result<Self, Self::Error> {
        match step {
            0 => Ok(CalibrationStep::Prompt),
            1 => Ok(CalibrationStep::CaptureAir),
            2 => Ok(CalibrationStep::CaptureWater),
            other => Err(other),
        }
    }
}

impl CalibrationStep {
    pub fn number(self) -> i32 {
        match self {
            CalibrationStep::Prompt => 0,
            CalibrationStep::CaptureAir => 1,
            CalibrationStep::CaptureWater => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationResponse {
    /// The step succeeded; the message tells the operator what to do before the next one.
    Next(String),
    Done(String),
    Error(String),
}

impl CalibrationResponse {
    pub fn message(&self) -> &str {
        match self {
            CalibrationResponse::Next(message)
            | CalibrationResponse::Done(message)
            | CalibrationResponse::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CalibrationResponse::Error(_))
    }
}

impl fmt::Display for CalibrationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationResponse::Next(message) => write!(f, "next: {}", message),
            CalibrationResponse::Done(message) => write!(f, "done: {}", message),
            CalibrationResponse::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Which extreme of a capture window is kept. The dry capture keeps the
/// lowest reading and the wet capture the highest, which is the outermost
/// value for a probe whose reading rises with moisture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Minimum,
    Maximum,
}

/// Takes [`CALIBRATION_SAMPLES`] instantaneous readings, pausing
/// [`SETTLING_DELAY_MS`] before each one after the first, and keeps one extreme.
pub fn capture<S, C>(source: &mut S, clock: &mut C, keep: Extreme) -> i32
where
    S: SamplingSource + ?Sized,
    C: SamplingClock + ?Sized,
{
    let mut kept = source.read_raw();

    for _ in 1..CALIBRATION_SAMPLES {
        clock.delay_ms(SETTLING_DELAY_MS);
        let sample = source.read_raw();
        kept = match keep {
            Extreme::Minimum => kept.min(sample),
            Extreme::Maximum => kept.max(sample),
        };
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ManualClock, ScriptedSource};

    #[test]
    fn step_numbers_round_trip() {
        for step in [
            CalibrationStep::Prompt,
            CalibrationStep::CaptureAir,
            CalibrationStep::CaptureWater,
        ] {
            assert_eq!(CalibrationStep::try_from(step.number()), Ok(step));
        }
        assert_eq!(CalibrationStep::try_from(3), Err(3));
        assert_eq!(CalibrationStep::try_from(-1), Err(-1));
    }

    #[test]
    fn dry_capture_keeps_minimum() {
        let mut source = ScriptedSource::new(&[480, 490, 470, 500, 460, 475, 485, 495, 465, 490]);
        let mut clock = ManualClock::default();

        let value = capture(&mut source, &mut clock, Extreme::Minimum);

        assert_eq!(value, 460);
        assert_eq!(source.raw_reads(), 10);
    }

    #[test]
    fn wet_capture_keeps_maximum() {
        let mut source = ScriptedSource::new(&[210, 220, 200, 230, 195, 215, 225, 235, 190, 205]);
        let mut clock = ManualClock::default();

        assert_eq!(capture(&mut source, &mut clock, Extreme::Maximum), 235);
    }

    #[test]
    fn settling_delay_between_samples_only() {
        let mut source = ScriptedSource::new(&[1]);
        let mut clock = ManualClock::default();

        capture(&mut source, &mut clock, Extreme::Minimum);

        assert_eq!(clock.delays(), 9);
        assert_eq!(clock.elapsed_ms(), 450);
    }

    #[test]
    fn response_exposes_message() {
        let response = CalibrationResponse::Error(SAVE_FAILED.to_string());
        assert!(response.is_error());
        assert_eq!(response.message(), "Couldn't save new configuration");
        assert_eq!(
            CalibrationResponse::Done(CALIBRATION_COMPLETE.to_string()).to_string(),
            "done: Calibration complete"
        );
    }
}
