use tracing::{debug, info};

use crate::config::TriggerConfig;
use crate::error::TriggerError;
use crate::metadata::Metadata;
use crate::normalize::{NormalizeReport, Normalizer};

/// Parse a trigger configuration from JSON without normalizing it
pub fn parse_trigger_config(json: &str) -> Result<TriggerConfig, TriggerError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a trigger configuration from YAML without normalizing it
pub fn parse_trigger_config_yaml(yaml: &str) -> Result<TriggerConfig, TriggerError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse a JSON trigger configuration, check it against `metadata` and
/// normalize it with a default [`Normalizer`].
pub fn load_trigger_config(
    json: &str,
    metadata: &Metadata,
) -> Result<(TriggerConfig, NormalizeReport), TriggerError> {
    load_trigger_config_with(&Normalizer::default(), json, metadata)
}

/// Same as [`load_trigger_config`] with an explicit normalizer
pub fn load_trigger_config_with(
    normalizer: &Normalizer,
    json: &str,
    metadata: &Metadata,
) -> Result<(TriggerConfig, NormalizeReport), TriggerError> {
    let config = parse_trigger_config(json)?;
    finish_load(normalizer, config, metadata)
}

/// Parse a YAML trigger configuration, check it against `metadata` and
/// normalize it with a default [`Normalizer`].
pub fn load_trigger_config_yaml(
    yaml: &str,
    metadata: &Metadata,
) -> Result<(TriggerConfig, NormalizeReport), TriggerError> {
    load_trigger_config_yaml_with(&Normalizer::default(), yaml, metadata)
}

/// Same as [`load_trigger_config_yaml`] with an explicit normalizer
pub fn load_trigger_config_yaml_with(
    normalizer: &Normalizer,
    yaml: &str,
    metadata: &Metadata,
) -> Result<(TriggerConfig, NormalizeReport), TriggerError> {
    let config = parse_trigger_config_yaml(yaml)?;
    finish_load(normalizer, config, metadata)
}

fn finish_load(
    normalizer: &Normalizer,
    mut config: TriggerConfig,
    metadata: &Metadata,
) -> Result<(TriggerConfig, NormalizeReport), TriggerError> {
    check_against_metadata(&config, metadata)?;

    debug!(trigger = %config.id, handlers = config.handlers.len(), "Normalizing trigger config");
    let report = normalizer.fix_up(&mut config, metadata);

    if !report.is_clean() {
        info!(
            trigger = %config.id,
            issues = report.issues.len(),
            "Trigger config loaded with uncoerced outputs"
        );
    }

    Ok((config, report))
}

fn check_against_metadata(config: &TriggerConfig, metadata: &Metadata) -> Result<(), TriggerError> {
    if config.trigger_ref.is_empty() {
        return Err(TriggerError::MissingRequiredField("ref".to_string()));
    }

    if !metadata.trigger_ref.is_empty() && metadata.trigger_ref != config.trigger_ref {
        return Err(TriggerError::MetadataMismatch {
            expected: metadata.trigger_ref.clone(),
            found: config.trigger_ref.clone(),
        });
    }

    Ok(())
}
