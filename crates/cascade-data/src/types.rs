use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeParseError;
use crate::Value;

/// The declared type of an attribute, as named in trigger metadata
/// (e.g. `"string"`, `"integer"`, `"params"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeType {
    /// Any value, passed through untouched
    #[default]
    Any,
    /// A string
    String,
    /// A signed 64-bit integer
    Integer,
    /// Any JSON number
    Number,
    /// A boolean
    Boolean,
    /// A JSON object
    Object,
    /// A JSON array
    Array,
    /// An object whose values are all strings
    Params,
    /// An object carrying a value together with its own metadata
    ComplexObject,
}

impl AttributeType {
    /// Canonical name of the type as written in metadata documents
    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Any => "any",
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Number => "number",
            AttributeType::Boolean => "boolean",
            AttributeType::Object => "object",
            AttributeType::Array => "array",
            AttributeType::Params => "params",
            AttributeType::ComplexObject => "complex_object",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Aliases are accepted for documents written against older descriptors
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(AttributeType::Any),
            "string" => Ok(AttributeType::String),
            "integer" | "int" => Ok(AttributeType::Integer),
            "number" | "double" | "float" => Ok(AttributeType::Number),
            "boolean" | "bool" => Ok(AttributeType::Boolean),
            "object" => Ok(AttributeType::Object),
            "array" => Ok(AttributeType::Array),
            "params" => Ok(AttributeType::Params),
            "complex_object" | "complexobject" => Ok(AttributeType::ComplexObject),
            _ => Err(TypeParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for AttributeType {
    type Error = TypeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AttributeType> for String {
    fn from(t: AttributeType) -> Self {
        t.name().to_string()
    }
}

/// A named attribute with a declared type, as listed in trigger metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Name of the attribute
    pub name: String,

    /// Declared type (defaults to `any` when omitted)
    #[serde(rename = "type", default)]
    pub attr_type: AttributeType,

    /// Optional default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Whether the attribute must be supplied
    #[serde(default)]
    pub required: bool,
}

impl Attribute {
    /// Create an optional attribute without a default value
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            value: None,
            required: false,
        }
    }

    /// The declared type of this attribute
    #[inline]
    pub fn attr_type(&self) -> AttributeType {
        self.attr_type
    }
}
