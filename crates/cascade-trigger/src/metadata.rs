use std::collections::HashMap;

use cascade_data::{Attribute, AttributeType};
use serde::{Deserialize, Serialize};

use crate::error::TriggerError;

/// Declared shape of a trigger type: its settings, its output attributes and
/// the settings each handler accepts.
///
/// Metadata is normally read from the trigger type's descriptor document:
///
/// ```
/// use cascade_trigger::Metadata;
/// use cascade_data::AttributeType;
///
/// let metadata = Metadata::from_json(r#"{
///     "name": "rest",
///     "ref": "github.com/cascade/trigger/rest",
///     "settings": [{ "name": "port", "type": "integer", "required": true }],
///     "output": [{ "name": "code", "type": "integer" }],
///     "handler": { "settings": [{ "name": "method", "type": "string" }] }
/// }"#).unwrap();
///
/// assert_eq!(metadata.output_type("code"), Some(AttributeType::Integer));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the trigger type
    #[serde(default)]
    pub name: String,

    /// Version of the trigger type
    #[serde(default)]
    pub version: String,

    /// Reference identifying the trigger type
    #[serde(rename = "ref", default)]
    pub trigger_ref: String,

    /// Declared trigger settings, by name
    #[serde(default, with = "attribute_list")]
    pub settings: HashMap<String, Attribute>,

    /// Declared output attributes, by name
    #[serde(default, alias = "outputs", with = "attribute_list")]
    pub output: HashMap<String, Attribute>,

    /// Declared handler shape
    #[serde(default)]
    pub handler: HandlerMetadata,
}

/// Declared shape of a handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerMetadata {
    /// Declared handler settings, by name
    #[serde(default, with = "attribute_list")]
    pub settings: HashMap<String, Attribute>,
}

impl Metadata {
    /// Create empty metadata for the trigger type `trigger_ref`
    pub fn new(trigger_ref: impl Into<String>) -> Self {
        Self {
            trigger_ref: trigger_ref.into(),
            ..Default::default()
        }
    }

    /// Parse a trigger descriptor document
    pub fn from_json(json: &str) -> Result<Self, TriggerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declare an output attribute
    pub fn with_output(mut self, name: impl Into<String>, attr_type: AttributeType) -> Self {
        let attr = Attribute::new(name, attr_type);
        self.output.insert(attr.name.clone(), attr);
        self
    }

    /// Declare a trigger setting
    pub fn with_setting(mut self, name: impl Into<String>, attr_type: AttributeType) -> Self {
        let attr = Attribute::new(name, attr_type);
        self.settings.insert(attr.name.clone(), attr);
        self
    }

    /// Look up a declared output attribute
    #[inline]
    pub fn output_attribute(&self, name: &str) -> Option<&Attribute> {
        self.output.get(name)
    }

    /// Declared type of an output attribute
    pub fn output_type(&self, name: &str) -> Option<AttributeType> {
        self.output_attribute(name).map(Attribute::attr_type)
    }
}

// Descriptors list attributes as arrays; lookups want them keyed by name
mod attribute_list {
    use std::collections::HashMap;

    use cascade_data::Attribute;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        attrs: &HashMap<String, Attribute>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut list: Vec<&Attribute> = attrs.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<String, Attribute>, D::Error> {
        let list = Vec::<Attribute>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|attr| (attr.name.clone(), attr)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let metadata = Metadata::new("github.com/cascade/trigger/timer")
            .with_setting("interval", AttributeType::Integer)
            .with_output("tick", AttributeType::Integer);

        assert_eq!(metadata.trigger_ref, "github.com/cascade/trigger/timer");
        assert_eq!(metadata.output_type("tick"), Some(AttributeType::Integer));
        assert_eq!(metadata.output_type("missing"), None);
        assert!(metadata.settings.contains_key("interval"));
    }

    #[test]
    fn test_legacy_outputs_key() {
        let metadata = Metadata::from_json(
            r#"{ "name": "kafka", "outputs": [{ "name": "message", "type": "string" }] }"#,
        )
        .unwrap();

        assert_eq!(metadata.output_type("message"), Some(AttributeType::String));
    }

    #[test]
    fn test_invalid_descriptor() {
        let err = Metadata::from_json(r#"{ "output": [{ "name": "x", "type": "decimal" }] }"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "ERR_TRIGGER_JSON_PARSE");
    }

    #[test]
    fn test_serializes_attributes_as_sorted_list() {
        let metadata = Metadata::new("t")
            .with_output("b", AttributeType::String)
            .with_output("a", AttributeType::Boolean);

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value["output"],
            json!([
                { "name": "a", "type": "boolean", "required": false },
                { "name": "b", "type": "string", "required": false }
            ])
        );
    }
}
