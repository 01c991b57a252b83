use std::fs;
use std::path::PathBuf;

use crate::error::SensorError;

/// File access the driver needs to keep its configuration across reboots.
pub trait Storage {
    /// Whether a configuration file already exists at `path`.
    fn check_config(&self, path: &str) -> bool;

    fn read_file(&self, path: &str) -> Result<String, SensorError>;

    /// Writes `contents` to `path`, creating missing directories. Not retried on failure.
    fn save_config(&mut self, path: &str, contents: &str) -> Result<(), SensorError>;
}

/// [`Storage`] over `std::fs`. Absolute configuration paths are resolved below `root`.
///
/// On the device the root is `/` and `/settings` is the mounted FAT partition.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for FileStorage {
    fn check_config(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read_file(&self, path: &str) -> Result<String, SensorError> {
        fs::read_to_string(self.resolve(path)).map_err(|e| SensorError::persistence(path, e))
    }

    fn save_config(&mut self, path: &str, contents: &str) -> Result<(), SensorError> {
        let file = self.resolve(path);

        if let Some(directory) = file.parent() {
            fs::create_dir_all(directory).map_err(|e| SensorError::persistence(path, e))?;
        }

        fs::write(&file, contents).map_err(|e| SensorError::persistence(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PATH: &str = "/settings/sen/SoilMoisture.json";

    #[test]
    fn missing_file_is_reported_absent() {
        let root = TempDir::new().unwrap();
        let storage = FileStorage::new(root.path());

        assert!(!storage.check_config(PATH));
        assert!(matches!(
            storage.read_file(PATH),
            Err(SensorError::Persistence { .. })
        ));
    }

    #[test]
    fn save_creates_directories_and_reads_back() {
        let root = TempDir::new().unwrap();
        let mut storage = FileStorage::new(root.path());

        storage
            .save_config(PATH, r#"{"AirValue":500,"WaterValue":200}"#)
            .unwrap();

        assert!(storage.check_config(PATH));
        assert!(root.path().join("settings/sen/SoilMoisture.json").is_file());
        assert_eq!(
            storage.read_file(PATH).unwrap(),
            r#"{"AirValue":500,"WaterValue":200}"#
        );

        storage.save_config(PATH, "{}").unwrap();
        assert_eq!(storage.read_file(PATH).unwrap(), "{}");
    }

    #[test]
    fn write_failure_is_a_persistence_error() {
        let root = TempDir::new().unwrap();
        // A plain file where the settings directory should be.
        fs::write(root.path().join("settings"), "").unwrap();
        let mut storage = FileStorage::new(root.path());

        let result = storage.save_config(PATH, "{}");

        match result {
            Err(SensorError::Persistence { path, .. }) => assert_eq!(path, PATH),
            other => panic!("expected a persistence error, got {other:?}"),
        }
    }
}
