use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::Value;

/// How a mapping definition's `value` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingType {
    /// Copy the referenced attribute
    Assign,
    /// Use the value as a literal
    Literal,
    /// Evaluate the value as an expression
    Expression,
    /// Build an object from the value template
    Object,
}

impl MappingType {
    /// Name used when serializing
    pub fn name(&self) -> &'static str {
        match self {
            MappingType::Assign => "assign",
            MappingType::Literal => "literal",
            MappingType::Expression => "expression",
            MappingType::Object => "object",
        }
    }

    /// Legacy numeric code (1-4) used by older documents
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(MappingType::Assign),
            2 => Some(MappingType::Literal),
            3 => Some(MappingType::Expression),
            4 => Some(MappingType::Object),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "assign" => Some(MappingType::Assign),
            "literal" => Some(MappingType::Literal),
            "expression" => Some(MappingType::Expression),
            "object" => Some(MappingType::Object),
            _ => None,
        }
    }
}

impl Serialize for MappingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Older documents write the type as a number, newer ones as a name
impl<'de> Deserialize<'de> for MappingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingTypeVisitor;

        impl Visitor<'_> for MappingTypeVisitor {
            type Value = MappingType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping type name or a numeric code between 1 and 4")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MappingType, E> {
                MappingType::from_code(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MappingType, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(MappingType::from_code)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MappingType, E> {
                if let Ok(code) = v.parse::<u64>() {
                    return self.visit_u64(code);
                }
                MappingType::from_name(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(MappingTypeVisitor)
    }
}

/// A single legacy input/output mapping definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDef {
    /// How `value` is interpreted
    #[serde(rename = "type")]
    pub mapping_type: MappingType,

    /// The mapping source (reference, literal or expression)
    #[serde(default)]
    pub value: Value,

    /// Name of the attribute the result is written to
    #[serde(rename = "mapTo")]
    pub map_to: String,
}

/// Legacy grouped input and output mappings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IoMappings {
    /// Mappings applied to the action's inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<MappingDef>,

    /// Mappings applied to the action's outputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<MappingDef>,
}
