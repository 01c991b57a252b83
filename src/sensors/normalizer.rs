use crate::configuration::sensor_configuration::CalibrationConfig;
use crate::error::SensorError;

/// Maps a reading onto the percentage scale defined by the two reference points.
///
/// `air` maps to 0 and `water` to 100, whichever of the two is numerically
/// larger. Integer division truncates toward zero. The result is not clamped:
/// a reading drier than `air` goes below 0, a wetter one above 100.
///
/// Identical reference points make the mapping undefined and return
/// [`SensorError::Configuration`].
pub fn normalize(raw: i32, air: i32, water: i32) -> Result<i32, SensorError> {
    if air == water {
        return Err(SensorError::configuration(format!(
            "cannot map reading {} with air and water values both {}",
            raw, air
        )));
    }

    let span = water as i64 - air as i64;
    let percent = (raw as i64 - air as i64) * 100 / span;

    Ok(percent.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

pub fn normalize_with(raw: i32, calibration: &CalibrationConfig) -> Result<i32, SensorError> {
    normalize(raw, calibration.air_value, calibration.water_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_points_map_to_bounds() {
        assert_eq!(normalize(500, 500, 200).unwrap(), 0);
        assert_eq!(normalize(200, 500, 200).unwrap(), 100);
        assert_eq!(normalize(350, 500, 200).unwrap(), 50);
    }

    #[test]
    fn inverted_polarity_maps_the_same_way() {
        assert_eq!(normalize(1200, 1200, 2800).unwrap(), 0);
        assert_eq!(normalize(2800, 1200, 2800).unwrap(), 100);
        assert_eq!(normalize(2000, 1200, 2800).unwrap(), 50);
    }

    #[test]
    fn readings_beyond_the_references_overshoot() {
        assert_eq!(normalize(530, 500, 200).unwrap(), -10);
        assert_eq!(normalize(170, 500, 200).unwrap(), 110);
    }

    #[test]
    fn linear_in_the_reading() {
        let (air, water) = (460, 235);
        // Every 9 counts toward water is 4 percent.
        for step in 0..20 {
            let raw = air - 9 * step;
            assert_eq!(normalize(raw, air, water).unwrap(), 4 * step);
        }
    }

    #[test]
    fn truncates_toward_zero() {
        // (499 - 500) * 100 / -300 = 0.33
        assert_eq!(normalize(499, 500, 200).unwrap(), 0);
        // (501 - 500) * 100 / -300 = -0.33
        assert_eq!(normalize(501, 500, 200).unwrap(), 0);
        assert_eq!(normalize(497, 500, 200).unwrap(), 1);
    }

    #[test]
    fn equal_references_are_a_configuration_error() {
        assert!(matches!(
            normalize(400, 300, 300),
            Err(SensorError::Configuration(_))
        ));
    }

    #[test]
    fn extreme_inputs_do_not_overflow() {
        assert_eq!(normalize(i32::MAX, 0, i32::MAX).unwrap(), 100);
        assert_eq!(normalize(i32::MIN, i32::MAX, i32::MIN).unwrap(), 100);
    }

    #[test]
    fn uses_calibration_record() {
        let calibration = CalibrationConfig::default();
        assert_eq!(normalize_with(350, &calibration).unwrap(), 50);
    }
}
