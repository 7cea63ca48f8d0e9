//! Component-to-schema matching and `additionalProperties` flexibility.
//!
//! A conversation record carries `componentsSchema.$defs`, keyed by schema
//! identifiers such as `CardProps`. Component names recovered from
//! validator details (`Card`) are matched to those keys with the ordered
//! rules in [`KEY_RULES`]; the first rule that matches any key wins.
//!
//! Fallback policy:
//! - no `$defs` at all: not flexible ("No schema found");
//! - no key matches: not flexible ("Schema key not found");
//! - matched key: flexible unless `properties.props.additionalProperties`
//!   is literally `false`. A schema that says nothing is permissive.

use crate::models::analysis::SchemaCheck;
use serde_json::{Map, Value as Json};

pub const NO_SCHEMA: &str = "No schema found";
pub const KEY_NOT_FOUND: &str = "Schema key not found";

const PROPS_SUFFIX: &str = "Props";

/// Predicate deciding whether a `$defs` key names the given component.
pub type KeyRule = fn(key: &str, component: &str) -> bool;

/// Matching rules in priority order.
pub const KEY_RULES: &[(&str, KeyRule)] = &[
    ("exact", exact),
    ("props-suffix", props_suffix),
    ("component-props-stripped", component_props_stripped),
    ("case-insensitive", case_insensitive),
];

/// `Card` matches key `Card`.
pub fn exact(key: &str, component: &str) -> bool {
    key == component
}

/// `Card` matches key `CardProps`.
pub fn props_suffix(key: &str, component: &str) -> bool {
    key.strip_suffix(PROPS_SUFFIX) == Some(component)
}

/// `CardProps` matches key `Card`.
pub fn component_props_stripped(key: &str, component: &str) -> bool {
    component.strip_suffix(PROPS_SUFFIX) == Some(key)
}

/// Any of the above, ignoring ASCII case.
pub fn case_insensitive(key: &str, component: &str) -> bool {
    let key = key.to_ascii_lowercase();
    let component = component.to_ascii_lowercase();
    let suffix = PROPS_SUFFIX.to_ascii_lowercase();
    key == component
        || key.strip_suffix(suffix.as_str()) == Some(component.as_str())
        || component.strip_suffix(suffix.as_str()) == Some(key.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flexibility {
    pub flexible: bool,
    pub reason: String,
}

impl Flexibility {
    fn rigid(reason: impl Into<String>) -> Self {
        Self {
            flexible: false,
            reason: reason.into(),
        }
    }

    pub fn into_check(self, component: &str) -> SchemaCheck {
        SchemaCheck {
            component: component.to_string(),
            flexible: self.flexible,
            reason: self.reason,
        }
    }
}

/// View over a conversation record's `componentsSchema.$defs`.
pub struct SchemaIndex<'a> {
    defs: Option<&'a Map<String, Json>>,
}

impl<'a> SchemaIndex<'a> {
    pub fn from_record(record: &'a Json) -> Self {
        Self {
            defs: record
                .get("componentsSchema")
                .and_then(|s| s.get("$defs"))
                .and_then(Json::as_object),
        }
    }

    /// Index with no schema information; every lookup fails safe.
    pub fn empty() -> Self {
        Self { defs: None }
    }

    /// Find the `$defs` entry for `component`, reporting which rule matched.
    pub fn find(&self, component: &str) -> Option<(&'static str, &'a str, &'a Json)> {
        let defs = self.defs?;
        KEY_RULES.iter().find_map(|(rule, matches)| {
            defs.iter()
                .find(|(key, _)| matches(key.as_str(), component))
                .map(|(key, schema)| (*rule, key.as_str(), schema))
        })
    }

    pub fn resolve(&self, component: &str) -> Flexibility {
        if self.defs.is_none() {
            return Flexibility::rigid(NO_SCHEMA);
        }
        let Some((rule, key, schema)) = self.find(component) else {
            return Flexibility::rigid(KEY_NOT_FOUND);
        };
        tracing::trace!(component, key, rule, "matched schema key");
        match schema.pointer("/properties/props/additionalProperties") {
            Some(Json::Bool(false)) => Flexibility {
                flexible: false,
                reason: format!("{} disallows additional properties", key),
            },
            Some(_) => Flexibility {
                flexible: true,
                reason: format!("{} allows additional properties", key),
            },
            None => Flexibility {
                flexible: true,
                reason: format!("{} does not restrict additional properties", key),
            },
        }
    }
}

/// Resolve flexibility for one component straight from a conversation record.
pub fn resolve(record: &Json, component: &str) -> Flexibility {
    SchemaIndex::from_record(record).resolve(component)
}
