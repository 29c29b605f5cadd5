//! Normalizer configuration.
//!
//! Options can be given programmatically, deserialized from a larger
//! configuration document, or read from the environment:
//!
//! | Variable                     | Values                          |
//! |------------------------------|---------------------------------|
//! | `CASCADE_COERCION_ERRORS`    | `report` (default), `silent`    |
//! | `CASCADE_ACTION_ID_STRATEGY` | `clock` (default), `sequential`, `uuid` |

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ids::{IdGenerator, MonotonicClockIds, SequentialIds, UuidIds};

/// Environment variable selecting the [`CoercionErrorPolicy`]
pub const COERCION_ERRORS_ENV: &str = "CASCADE_COERCION_ERRORS";

/// Environment variable selecting the [`ActionIdStrategy`]
pub const ACTION_ID_STRATEGY_ENV: &str = "CASCADE_ACTION_ID_STRATEGY";

/// What happens when an output value cannot be coerced to its declared type.
///
/// The original value is kept in place under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionErrorPolicy {
    /// Record the failure in the normalize report and log a warning
    #[default]
    Report,
    /// Drop the failure without a trace
    Silent,
}

impl FromStr for CoercionErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(CoercionErrorPolicy::Report),
            "silent" => Ok(CoercionErrorPolicy::Silent),
            other => Err(format!("unknown coercion error policy '{}'", other)),
        }
    }
}

/// How identifiers are generated for handlers missing an `actionId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionIdStrategy {
    /// Monotonic wall-clock nanoseconds
    #[default]
    Clock,
    /// Decimal counter starting at 1
    Sequential,
    /// Random UUID v4
    Uuid,
}

impl ActionIdStrategy {
    /// Build a generator implementing this strategy
    pub fn generator(&self) -> Arc<dyn IdGenerator> {
        match self {
            ActionIdStrategy::Clock => Arc::new(MonotonicClockIds),
            ActionIdStrategy::Sequential => Arc::new(SequentialIds::default()),
            ActionIdStrategy::Uuid => Arc::new(UuidIds),
        }
    }
}

impl FromStr for ActionIdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(ActionIdStrategy::Clock),
            "sequential" => Ok(ActionIdStrategy::Sequential),
            "uuid" => Ok(ActionIdStrategy::Uuid),
            other => Err(format!("unknown action id strategy '{}'", other)),
        }
    }
}

/// Normalizer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Handling of output coercion failures
    #[serde(default)]
    pub coercion_errors: CoercionErrorPolicy,

    /// Generation of missing action identifiers
    #[serde(default)]
    pub action_ids: ActionIdStrategy,
}

impl NormalizeOptions {
    /// Load options from the environment, keeping defaults for unset or invalid variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load options through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(policy) = lookup(COERCION_ERRORS_ENV) {
            match policy.parse() {
                Ok(policy) => options.coercion_errors = policy,
                Err(e) => warn!("Invalid {} value: {}", COERCION_ERRORS_ENV, e),
            }
        }

        if let Some(strategy) = lookup(ACTION_ID_STRATEGY_ENV) {
            match strategy.parse() {
                Ok(strategy) => options.action_ids = strategy,
                Err(e) => warn!("Invalid {} value: {}", ACTION_ID_STRATEGY_ENV, e),
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = NormalizeOptions::default();
        assert_eq!(options.coercion_errors, CoercionErrorPolicy::Report);
        assert_eq!(options.action_ids, ActionIdStrategy::Clock);
    }

    #[test]
    fn test_from_lookup() {
        let options = NormalizeOptions::from_lookup(lookup_from(&[
            (COERCION_ERRORS_ENV, "Silent"),
            (ACTION_ID_STRATEGY_ENV, "uuid"),
        ]));

        assert_eq!(options.coercion_errors, CoercionErrorPolicy::Silent);
        assert_eq!(options.action_ids, ActionIdStrategy::Uuid);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let options = NormalizeOptions::from_lookup(lookup_from(&[
            (COERCION_ERRORS_ENV, "panic"),
            (ACTION_ID_STRATEGY_ENV, "snowflake"),
        ]));

        assert_eq!(options, NormalizeOptions::default());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: NormalizeOptions =
            serde_json::from_str(r#"{ "action_ids": "sequential" }"#).unwrap();

        assert_eq!(options.coercion_errors, CoercionErrorPolicy::Report);
        assert_eq!(options.action_ids, ActionIdStrategy::Sequential);
    }

    #[test]
    fn test_strategy_generators() {
        assert_eq!(ActionIdStrategy::Sequential.generator().next_id(), "1");
        assert!(ActionIdStrategy::Clock.generator().next_id().parse::<u64>().is_ok());
        assert_eq!(ActionIdStrategy::Uuid.generator().next_id().len(), 36);
    }
}
