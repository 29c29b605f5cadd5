//! # Cascade Trigger
//!
//! Trigger configuration for the Cascade platform: the document model for a
//! trigger instance and its handlers, the trigger metadata it is checked
//! against, and the one-shot normalization pass that prepares a freshly
//! loaded configuration for use.
//!
//! ```
//! use cascade_data::AttributeType;
//! use cascade_trigger::{load_trigger_config, Metadata, SettingsOwner};
//! use serde_json::json;
//!
//! let metadata = Metadata::new("github.com/cascade/trigger/rest")
//!     .with_output("code", AttributeType::Integer);
//!
//! let (config, report) = load_trigger_config(r#"{
//!     "id": "rest_1",
//!     "ref": "github.com/cascade/trigger/rest",
//!     "settings": { "port": 8080 },
//!     "outputs": { "code": "200" },
//!     "handlers": [{ "settings": { "method": "GET" } }]
//! }"#, &metadata).unwrap();
//!
//! assert!(report.is_clean());
//! assert_eq!(config.output["code"], json!(200));
//! assert_eq!(config.get_setting("port"), "8080");
//! assert!(!config.handlers[0].action_id.is_empty());
//! assert!(config.is_parent_of(&config.handlers[0]));
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod loader;
pub mod metadata;
pub mod normalize;
pub mod options;

pub use config::{
    ActionConfig, HandlerConfig, HandlerLink, OwnerToken, SettingsOwner, TriggerConfig,
};
pub use error::TriggerError;
pub use ids::{IdGenerator, MonotonicClockIds, SequentialIds, UuidIds};
pub use loader::{
    load_trigger_config, load_trigger_config_with, load_trigger_config_yaml,
    load_trigger_config_yaml_with, parse_trigger_config, parse_trigger_config_yaml,
};
pub use metadata::{HandlerMetadata, Metadata};
pub use normalize::{CoercionIssue, NormalizeReport, Normalizer};
pub use options::{ActionIdStrategy, CoercionErrorPolicy, NormalizeOptions};

/// Result type for trigger configuration operations
pub type Result<T> = std::result::Result<T, TriggerError>;
