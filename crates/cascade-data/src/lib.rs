//! # Cascade Data
//!
//! Value-level building blocks shared by the Cascade trigger configuration
//! crates. Configuration documents arrive loosely typed; this crate gives
//! them a closed value model and the services that make sense of it:
//!
//! * [`AttributeType`] and [`Attribute`] describe the declared shape of an attribute
//! * [`coerce_to_value`] converts an untyped value into a declared type
//! * [`get_value_with_resolver`] looks a setting up, resolving `$env[..]`
//!   and `$property[..]` expressions on the way
//! * [`MappingDef`] and [`IoMappings`] carry legacy action wiring unchanged
//!
//! ## Example
//!
//! ```
//! use cascade_data::{coerce_to_value, AttributeType};
//! use serde_json::json;
//!
//! let coerced = coerce_to_value(&json!("200"), AttributeType::Integer).unwrap();
//! assert_eq!(coerced, json!(200));
//! ```

mod coerce;
mod error;
mod mapping;
mod resolve;
mod types;

pub use coerce::{
    coerce_to_array, coerce_to_boolean, coerce_to_integer, coerce_to_number, coerce_to_object,
    coerce_to_params, coerce_to_string, coerce_to_value, kind_of,
};
pub use error::{CoercionError, ResolveError, TypeParseError};
pub use mapping::{IoMappings, MappingDef, MappingType};
pub use resolve::{
    get_value_with_resolver, DefaultResolver, ResolverExpression, SettingResolver,
};
pub use types::{Attribute, AttributeType};

/// The closed variant every untyped configuration value is held in.
pub use serde_json::Value;

/// A loosely typed mapping from names to values, as found in `settings` and `output`.
pub type ValueMap = std::collections::HashMap<String, Value>;
