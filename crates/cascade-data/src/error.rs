use thiserror::Error;

use crate::types::AttributeType;

/// Failure to convert a value into a declared attribute type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The value's kind has no conversion to the target type
    #[error("unable to coerce {found} value '{value}' to {target}")]
    Mismatch {
        /// Rendered form of the offending value
        value: String,
        /// Kind of the offending value (e.g. "string", "array")
        found: &'static str,
        /// The declared type that was requested
        target: AttributeType,
    },

    /// The value is numeric but does not fit the target representation
    #[error("number {value} is out of range for {target}")]
    OutOfRange {
        /// Rendered form of the offending number
        value: String,
        /// The declared type that was requested
        target: AttributeType,
    },

    /// A string was expected to hold JSON for the target type but did not
    #[error("value '{value}' is not valid JSON for {target}: {reason}")]
    InvalidJson {
        /// The string that failed to parse
        value: String,
        /// The declared type that was requested
        target: AttributeType,
        /// Parser message
        reason: String,
    },
}

/// Failure to resolve a setting expression such as `$env[HOME]`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The expression names a source no resolver knows about
    #[error("unknown resolver source '{0}'")]
    UnknownSource(String),

    /// The referenced environment variable is not set
    #[error("environment variable '{0}' is not set")]
    EnvNotSet(String),

    /// The referenced property has not been registered
    #[error("property '{0}' not found")]
    PropertyNotFound(String),

    /// The string is not a resolver expression at all
    #[error("malformed resolver expression '{0}'")]
    Malformed(String),
}

/// Failure to parse a declared type name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown attribute type '{0}'")]
pub struct TypeParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                CoercionError::Mismatch {
                    value: "abc".to_string(),
                    found: "string",
                    target: AttributeType::Integer,
                },
                "unable to coerce string value 'abc' to integer",
            ),
            (
                CoercionError::OutOfRange {
                    value: "18446744073709551615".to_string(),
                    target: AttributeType::Integer,
                },
                "number 18446744073709551615 is out of range for integer",
            ),
            (
                CoercionError::InvalidJson {
                    value: "{".to_string(),
                    target: AttributeType::Object,
                    reason: "EOF".to_string(),
                },
                "value '{' is not valid JSON for object: EOF",
            ),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_resolve_error_display() {
        assert_eq!(
            ResolveError::EnvNotSet("HOME".to_string()).to_string(),
            "environment variable 'HOME' is not set"
        );
        assert_eq!(
            ResolveError::UnknownSource("vault".to_string()).to_string(),
            "unknown resolver source 'vault'"
        );
        assert_eq!(
            TypeParseError("decimal".to_string()).to_string(),
            "unknown attribute type 'decimal'"
        );
    }
}
