//! # Schema Definition Module
//!
//! Declarative JSON form of a mapper configuration. A definition is parsed
//! with serde, then compiled into a [`Mapper`] so that every configuration
//! problem surfaces before any record is processed.
//!
//! ## Example
//!
//! ```json
//! {
//!     "fields": {
//!         "name":  {"type": "text", "max_length": 50},
//!         "phone": {"type": "text", "max_length": 15, "required": false},
//!         "email": {"type": "text", "validator": "email"}
//!     },
//!     "rename": {"email": "contact_email"},
//!     "enforce_optional_presence": false
//! }
//! ```

use crate::engine::error::{MapperError, Result};
use crate::engine::mapper::Mapper;
use crate::engine::rule::{FieldRule, FieldType};
use crate::engine::schema::{RenameMap, RuleSet};
use crate::engine::validators::{ValidatorConfig, ValidatorRegistry};
use indexmap::IndexMap;
use log::debug;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Deserialize a JSON object into an ordered map, rejecting repeated keys
///
/// A plain map would keep the last occurrence and silently discard the others.
fn unique_keys<'de, D, T>(deserializer: D) -> std::result::Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct UniqueKeys<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for UniqueKeys<T>
    where
        T: Deserialize<'de>,
    {
        type Value = IndexMap<String, T>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map with unique keys")
        }

        fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key '{key}'")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

/// One field rule as written in a schema definition
///
/// Unknown keys are rejected so that a misspelled constraint cannot be
/// dropped without notice.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub max_length: Option<i64>,

    #[serde(default, alias = "required_field")]
    pub field_required: Option<bool>,

    #[serde(default, alias = "required_value")]
    pub value_required: Option<bool>,

    /// Legacy shorthand for setting both flags
    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default, alias = "custom")]
    pub validator: Option<ValidatorConfig>,
}

impl RuleDefinition {
    /// Compile into a [`FieldRule`]
    ///
    /// Explicit `field_required`/`value_required` take precedence over the
    /// `required` shorthand; both default to true.
    pub fn to_rule(&self, field: &str, registry: &ValidatorRegistry) -> Result<FieldRule> {
        let field_type: FieldType = self
            .field_type
            .parse()
            .map_err(|e: MapperError| e.for_field(field))?;

        let shorthand = self.required.unwrap_or(true);
        let mut rule = FieldRule::new(field_type)
            .field_required(self.field_required.unwrap_or(shorthand))
            .value_required(self.value_required.unwrap_or(shorthand));

        if let Some(max_length) = self.max_length {
            let max_length = usize::try_from(max_length)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    MapperError::configuration(format!(
                        "Field '{field}': max_length must be greater than zero, got {max_length}"
                    ))
                })?;
            rule = rule.max_length(max_length);
        }

        if let Some(config) = &self.validator {
            let validator = registry.resolve(config).map_err(|e| e.for_field(field))?;
            rule = rule.shared_validator(validator);
        }

        Ok(rule)
    }
}

/// Complete mapper configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    #[serde(deserialize_with = "unique_keys")]
    pub fields: IndexMap<String, RuleDefinition>,

    #[serde(default, deserialize_with = "unique_keys")]
    pub rename: IndexMap<String, String>,

    #[serde(default, alias = "check_optional_fields")]
    pub enforce_optional_presence: bool,
}

impl SchemaDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MapperError::from_serde)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(MapperError::from_serde)
    }

    /// Compile the rule set described by this definition
    pub fn rule_set(&self, registry: &ValidatorRegistry) -> Result<RuleSet> {
        let mut rules = RuleSet::new();
        for (field, definition) in &self.fields {
            rules.insert(field.clone(), definition.to_rule(field, registry)?)?;
        }
        Ok(rules)
    }

    pub fn rename_map(&self) -> RenameMap {
        self.rename
            .iter()
            .map(|(field, target)| (field.clone(), target.clone()))
            .collect()
    }

    /// Compile into a ready-to-use [`Mapper`]
    pub fn build(&self, registry: &ValidatorRegistry) -> Result<Mapper> {
        debug!(
            "Compiling schema definition with {} fields",
            self.fields.len()
        );
        Mapper::builder(self.rule_set(registry)?)
            .rename_map(self.rename_map())
            .enforce_optional_presence(self.enforce_optional_presence)
            .build()
    }
}
