//! Setting lookup with embedded resolver expressions.
//!
//! A setting value that is a string of the form `$env[NAME]`,
//! `$property[NAME]`, `${env.NAME}` or `${property.NAME}` is resolved through
//! a [`SettingResolver`] before being handed to the caller.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::ResolveError;
use crate::Value;

lazy_static! {
    // `$env[NAME]` / `$property[NAME]`
    static ref BRACKET_EXPR_REGEX: Regex = Regex::new(
        r"^\$([a-zA-Z][a-zA-Z0-9_]*)\[([^\[\]]+)\]$"
    ).unwrap();

    // `${env.NAME}` / `${property.NAME}`
    static ref BRACE_EXPR_REGEX: Regex = Regex::new(
        r"^\$\{([a-zA-Z][a-zA-Z0-9_]*)\.([^{}]+)\}$"
    ).unwrap();
}

/// A parsed resolver expression: a source (e.g. `env`) and the name looked up in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverExpression {
    /// Resolver source, e.g. `env` or `property`
    pub source: String,

    /// Name to look up within the source
    pub name: String,
}

impl ResolverExpression {
    /// Parse a resolver expression, returning `None` when `s` is not one
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        BRACKET_EXPR_REGEX
            .captures(s)
            .or_else(|| BRACE_EXPR_REGEX.captures(s))
            .and_then(|captures| {
                let source = captures.get(1)?.as_str();
                let name = captures.get(2)?.as_str().trim();
                Some(ResolverExpression {
                    source: source.to_string(),
                    name: name.to_string(),
                })
            })
    }
}

/// Resolves expressions embedded in setting values
pub trait SettingResolver: Send + Sync {
    /// Resolve a single expression such as `$env[HOME]` to its value
    fn resolve(&self, expression: &str) -> Result<Value, ResolveError>;
}

/// Resolver backed by the process environment and a static property table
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    properties: HashMap<String, Value>,
}

impl DefaultResolver {
    /// Create a resolver with no properties registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver over the given property table
    pub fn with_properties(properties: HashMap<String, Value>) -> Self {
        Self { properties }
    }

    /// Register a single property
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

impl SettingResolver for DefaultResolver {
    fn resolve(&self, expression: &str) -> Result<Value, ResolveError> {
        let expr = ResolverExpression::parse(expression)
            .ok_or_else(|| ResolveError::Malformed(expression.to_string()))?;

        match expr.source.as_str() {
            "env" => std::env::var(&expr.name)
                .map(Value::String)
                .map_err(|_| ResolveError::EnvNotSet(expr.name)),
            "property" => self
                .properties
                .get(&expr.name)
                .cloned()
                .ok_or(ResolveError::PropertyNotFound(expr.name)),
            _ => Err(ResolveError::UnknownSource(expr.source.clone())),
        }
    }
}

/// Look `key` up in `settings`, resolving the stored value if it is an expression.
///
/// Returns `None` when the key is absent or when its expression cannot be
/// resolved. Strings that merely start with `$` but are not expressions are
/// returned verbatim.
pub fn get_value_with_resolver(
    settings: &HashMap<String, Value>,
    key: &str,
    resolver: &dyn SettingResolver,
) -> Option<Value> {
    let value = settings.get(key)?;

    match value {
        Value::String(s) if ResolverExpression::parse(s).is_some() => {
            match resolver.resolve(s) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    debug!(setting = key, expression = %s, error = %e, "Unable to resolve setting");
                    None
                }
            }
        }
        _ => Some(value.clone()),
    }
}
