use thiserror::Error;

/// Errors raised while loading a trigger configuration document.
///
/// Normalization itself never fails; problems found there are reported
/// through [`crate::NormalizeReport`] instead.
#[derive(Error, Debug)]
pub enum TriggerError {
    /// Errors that occur during JSON processing
    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// The metadata supplied describes a different trigger type
    #[error("Metadata for trigger '{expected}' cannot be applied to trigger '{found}'")]
    MetadataMismatch {
        /// `ref` declared by the metadata
        expected: String,
        /// `ref` declared by the configuration
        found: String,
    },
}

impl TriggerError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TriggerError::JsonError(_) => "ERR_TRIGGER_JSON_PARSE",
            TriggerError::YamlError(_) => "ERR_TRIGGER_YAML_PARSE",
            TriggerError::MissingRequiredField(_) => "ERR_TRIGGER_MISSING_FIELD",
            TriggerError::MetadataMismatch { .. } => "ERR_TRIGGER_METADATA_MISMATCH",
        }
    }
}
