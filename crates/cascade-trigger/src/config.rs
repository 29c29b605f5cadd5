use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use cascade_data::{
    coerce_to_string, get_value_with_resolver, DefaultResolver, IoMappings, MappingDef,
    SettingResolver, Value, ValueMap,
};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::normalize::{NormalizeReport, Normalizer};

/// The configuration of one trigger instance and the handlers bound to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Human-readable name of the trigger
    #[serde(default)]
    pub name: String,

    /// Identifier of this trigger instance
    #[serde(default)]
    pub id: String,

    /// Reference to the trigger type implementing this instance
    #[serde(rename = "ref", default)]
    pub trigger_ref: String,

    /// Trigger settings, interpreted only through a [`SettingResolver`]
    #[serde(default)]
    pub settings: ValueMap,

    /// Output values, coerced against the trigger metadata
    #[serde(default)]
    pub output: ValueMap,

    /// Handlers in declaration order
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,

    /// Output values under the deprecated `outputs` key
    #[serde(rename = "outputs", default, skip_serializing_if = "HashMap::is_empty")]
    pub outputs_legacy: ValueMap,

    /// Identity handed to this trigger's handlers by normalization
    #[serde(skip)]
    pub owner: Option<OwnerToken>,
}

/// One binding of a trigger to an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Handler settings
    #[serde(default)]
    pub settings: ValueMap,

    /// Output values, coerced against the trigger metadata
    #[serde(default)]
    pub output: ValueMap,

    /// The bound action's own configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionConfig>,

    /// Identifier of the bound action; synthesized during normalization when empty
    #[serde(rename = "actionId", default)]
    pub action_id: String,

    /// Deprecated grouped mappings
    #[serde(rename = "actionMappings", default, skip_serializing_if = "Option::is_none")]
    pub action_mappings: Option<IoMappings>,

    /// Output values under the deprecated `outputs` key
    #[serde(rename = "outputs", default, skip_serializing_if = "HashMap::is_empty")]
    pub outputs_legacy: ValueMap,

    /// Deprecated output mappings
    #[serde(rename = "actionOutputMappings", default, skip_serializing_if = "Vec::is_empty")]
    pub action_output_mappings: Vec<MappingDef>,

    /// Deprecated input mappings
    #[serde(rename = "actionInputMappings", default, skip_serializing_if = "Vec::is_empty")]
    pub action_input_mappings: Vec<MappingDef>,

    #[serde(skip)]
    parent: Option<HandlerLink>,
}

/// Opaque configuration of the action a handler is bound to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionConfig(pub Value);

impl ActionConfig {
    /// The raw action configuration
    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The action's `ref`, if it declares one
    pub fn action_ref(&self) -> Option<&str> {
        self.0.get("ref").and_then(Value::as_str)
    }
}

static NEXT_OWNER_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a normalized trigger.
///
/// Trigger ids come from documents and may repeat or be empty, so handler
/// links are matched on this token instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerToken(u64);

impl OwnerToken {
    pub(crate) fn next() -> Self {
        OwnerToken(NEXT_OWNER_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// Non-owning link from a handler back to the trigger that owns it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerLink {
    /// `id` of the owning trigger
    pub trigger_id: String,

    /// Position of the handler within the trigger's handler list
    pub position: usize,

    pub(crate) owner: OwnerToken,
}

/// Anything carrying a settings map that can be read through the setting accessor
pub trait SettingsOwner {
    /// The raw settings map
    fn settings(&self) -> &ValueMap;

    /// Fetch a setting as a string, resolving `$env[..]` expressions.
    ///
    /// An absent key, an unresolvable expression and a value that cannot be
    /// rendered as a string all yield the empty string; callers that need to
    /// tell these apart must use [`get_value_with_resolver`] directly.
    fn get_setting(&self, key: &str) -> String {
        self.get_setting_with(key, &DefaultResolver::new())
    }

    /// Fetch a setting as a string using the given resolver
    fn get_setting_with(&self, key: &str, resolver: &dyn SettingResolver) -> String {
        lookup_setting(self.settings(), key, resolver).unwrap_or_default()
    }
}

fn lookup_setting(
    settings: &ValueMap,
    key: &str,
    resolver: &dyn SettingResolver,
) -> Option<String> {
    let value = get_value_with_resolver(settings, key, resolver)?;
    coerce_to_string(&value).ok()
}

impl SettingsOwner for TriggerConfig {
    fn settings(&self) -> &ValueMap {
        &self.settings
    }
}

impl SettingsOwner for HandlerConfig {
    fn settings(&self) -> &ValueMap {
        &self.settings
    }
}

impl TriggerConfig {
    /// Normalize this configuration in place with a default [`Normalizer`]
    pub fn fix_up(&mut self, metadata: &Metadata) -> NormalizeReport {
        Normalizer::default().fix_up(self, metadata)
    }

    /// Whether `handler` is the handler that normalization linked to this
    /// trigger at its recorded position.
    pub fn is_parent_of(&self, handler: &HandlerConfig) -> bool {
        let (Some(owner), Some(link)) = (self.owner, handler.parent()) else {
            return false;
        };

        link.owner == owner
            && self
                .handlers
                .get(link.position)
                .is_some_and(|linked| std::ptr::eq(linked, handler))
    }

    /// Fetch a handler setting, falling back to the trigger's own settings
    /// when the handler does not define it.
    ///
    /// Returns the empty string when `position` is out of range.
    pub fn handler_setting(&self, position: usize, key: &str) -> String {
        self.handlers
            .get(position)
            .map(|handler| handler.get_setting_or_parent(self, key))
            .unwrap_or_default()
    }
}

impl HandlerConfig {
    /// Create a handler with no settings, outputs or action
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler settings
    pub fn with_settings(mut self, settings: ValueMap) -> Self {
        self.settings = settings;
        self
    }

    /// Set the output values
    pub fn with_output(mut self, output: ValueMap) -> Self {
        self.output = output;
        self
    }

    /// Set output values under the deprecated `outputs` key
    pub fn with_legacy_outputs(mut self, outputs: ValueMap) -> Self {
        self.outputs_legacy = outputs;
        self
    }

    /// Set the bound action identifier
    pub fn with_action_id(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = action_id.into();
        self
    }

    /// Set the bound action's configuration
    pub fn with_action(mut self, action: ActionConfig) -> Self {
        self.action = Some(action);
        self
    }

    /// The link to the owning trigger, set during normalization
    #[inline]
    pub fn parent(&self) -> Option<&HandlerLink> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, link: HandlerLink) {
        self.parent = Some(link);
    }

    /// Fetch a setting from this handler, or from `parent` when the handler
    /// does not define it and `parent` is the trigger this handler is linked to.
    pub fn get_setting_or_parent(&self, parent: &TriggerConfig, key: &str) -> String {
        let resolver = DefaultResolver::new();

        if let Some(value) = lookup_setting(&self.settings, key, &resolver) {
            return value;
        }

        if parent.is_parent_of(self) {
            return parent.get_setting_with(key, &resolver);
        }

        String::new()
    }
}
