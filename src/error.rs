/// Failures the driver reports at its operation boundary.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Configuration text is not valid JSON, not an object, or a field has the wrong type.
    #[error("Deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Reading or writing the configuration file failed.
    #[error("Storage access to {path} failed: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Values that parse fine but cannot be used, e.g. identical reference points.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SensorError {
    pub fn persistence(path: &str, source: std::io::Error) -> Self {
        SensorError::Persistence {
            path: path.to_string(),
            source,
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        SensorError::Configuration(reason.into())
    }
}
