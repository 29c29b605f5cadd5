//! The normalization pass run once on a freshly loaded trigger configuration.
//!
//! [`Normalizer::fix_up`] migrates legacy `outputs` maps, coerces output
//! values to the types declared in [`Metadata`], links every handler to its
//! trigger and assigns action identifiers to handlers that lack one. It never
//! fails: values that cannot be coerced are left as they were and reported.

use std::fmt;
use std::sync::Arc;

use cascade_data::{coerce_to_value, AttributeType, CoercionError, ValueMap};
use tracing::{debug, warn};

use crate::config::{HandlerLink, OwnerToken, TriggerConfig};
use crate::ids::IdGenerator;
use crate::metadata::Metadata;
use crate::options::{CoercionErrorPolicy, NormalizeOptions};

/// An output value that could not be coerced to its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionIssue {
    /// Location of the value (e.g. `handlers[1].output.code`)
    pub path: String,

    /// Name of the output attribute
    pub attribute: String,

    /// The type declared by the metadata
    pub declared_type: AttributeType,

    /// Why coercion failed
    pub error: CoercionError,
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// What a normalization pass changed or could not change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Output values left uncoerced
    pub issues: Vec<CoercionIssue>,

    /// Paths of output maps filled from the legacy `outputs` key
    pub migrated: Vec<String>,

    /// Positions of handlers whose `actionId` was synthesized
    pub synthesized_action_ids: Vec<usize>,
}

impl NormalizeReport {
    /// True when every declared output value was coerced
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Normalizes trigger configurations against their metadata
#[derive(Clone)]
pub struct Normalizer {
    policy: CoercionErrorPolicy,
    ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl Normalizer {
    /// Create a normalizer from options
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            policy: options.coercion_errors,
            ids: options.action_ids.generator(),
        }
    }

    /// Replace the action identifier generator
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Normalize `config` in place against `metadata`.
    ///
    /// Running this twice on the same configuration is a no-op the second
    /// time: coerced values coerce to themselves and existing action ids are kept.
    pub fn fix_up(&self, config: &mut TriggerConfig, metadata: &Metadata) -> NormalizeReport {
        let mut report = NormalizeReport::default();

        // Trigger-level outputs
        if migrate_legacy_output(&mut config.output, &mut config.outputs_legacy) {
            debug!(trigger = %config.id, "Migrated legacy trigger outputs");
            report.migrated.push("output".to_string());
        }
        self.coerce_outputs(&mut config.output, metadata, "output", &mut report);

        // Reused when the config was normalized before
        let owner = *config.owner.get_or_insert_with(OwnerToken::next);

        // Handlers, in declaration order
        for (position, handler) in config.handlers.iter_mut().enumerate() {
            handler.set_parent(HandlerLink {
                trigger_id: config.id.clone(),
                position,
                owner,
            });

            if handler.action_id.is_empty() {
                handler.action_id = self.ids.next_id();
                debug!(
                    trigger = %config.id,
                    handler = position,
                    action_id = %handler.action_id,
                    "Synthesized missing action id"
                );
                report.synthesized_action_ids.push(position);
            }

            let scope = format!("handlers[{}].output", position);
            if migrate_legacy_output(&mut handler.output, &mut handler.outputs_legacy) {
                debug!(trigger = %config.id, handler = position, "Migrated legacy handler outputs");
                report.migrated.push(scope.clone());
            }
            self.coerce_outputs(&mut handler.output, metadata, &scope, &mut report);
        }

        report
    }

    fn coerce_outputs(
        &self,
        output: &mut ValueMap,
        metadata: &Metadata,
        scope: &str,
        report: &mut NormalizeReport,
    ) {
        // Sorted so the report does not depend on map iteration order
        let mut names: Vec<String> = output
            .keys()
            .filter(|name| metadata.output.contains_key(name.as_str()))
            .cloned()
            .collect();
        names.sort();

        for name in names {
            let (Some(attr), Some(value)) = (metadata.output_attribute(&name), output.get_mut(&name))
            else {
                continue;
            };

            match coerce_to_value(value, attr.attr_type()) {
                Ok(coerced) => *value = coerced,
                Err(error) => {
                    if self.policy == CoercionErrorPolicy::Silent {
                        continue;
                    }
                    let issue = CoercionIssue {
                        path: format!("{}.{}", scope, name),
                        attribute: name,
                        declared_type: attr.attr_type(),
                        error,
                    };
                    warn!(
                        path = %issue.path,
                        declared_type = %issue.declared_type,
                        error = %issue.error,
                        "Output value left uncoerced"
                    );
                    report.issues.push(issue);
                }
            }
        }
    }
}

/// Fill an empty `output` from the legacy map; the legacy map is always emptied.
///
/// Returns true when values were moved over.
fn migrate_legacy_output(output: &mut ValueMap, legacy: &mut ValueMap) -> bool {
    let legacy_values = std::mem::take(legacy);
    if output.is_empty() && !legacy_values.is_empty() {
        *output = legacy_values;
        return true;
    }
    false
}
