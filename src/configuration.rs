pub mod sensor_configuration;
pub mod storage;

#[cfg(target_os = "espidf")]
pub mod flash_storage;

pub const SETTINGS_DIRECTORY: &str = "/settings/sen/";
pub const DEFAULT_CONFIG_FILE: &str = "SoilMoisture.json";

pub fn make_config_path(config_file: &str) -> String {
    format!("{}{}", SETTINGS_DIRECTORY, config_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_files_live_under_the_sensor_settings_directory() {
        assert_eq!(
            make_config_path(DEFAULT_CONFIG_FILE),
            "/settings/sen/SoilMoisture.json"
        );
        assert_eq!(make_config_path("Bed2.json"), "/settings/sen/Bed2.json");
    }
}
