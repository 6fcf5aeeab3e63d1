//! Parsed record properties.
//!
//! A properties blob is a flat JSON object: field name to scalar value.
//! Integers carry ratings and ranks; numeric-string values carry epoch
//! timestamps marking when a flag was set. [`Properties`] is the parsed
//! form, plus a builder surface for callers assembling records in code.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::errors::PropertiesError;

/// Ordered field -> value mapping of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    fields: BTreeMap<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a serialized blob.
    ///
    /// Parsing validates shape only (valid JSON, object at the top level);
    /// values are kept verbatim.
    pub fn parse(json: &str) -> Result<Self, PropertiesError> {
        let value: Value = serde_json::from_str(json).map_err(PropertiesError::InvalidJson)?;
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(PropertiesError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Serializes to a JSON object with deterministic (sorted) field order.
    pub fn to_json(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Value::Object(map).to_string()
    }

    /// Sets a raw field value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Sets an integer-valued field.
    pub fn set_number(&mut self, name: impl Into<String>, value: i64) -> &mut Self {
        self.fields.insert(name.into(), Value::Number(value.into()));
        self
    }

    /// Sets a flag field: the value is the epoch second of `at`, stored as a
    /// numeric string.
    pub fn set_flag(&mut self, name: impl Into<String>, at: DateTime<Utc>) -> &mut Self {
        self.fields
            .insert(name.into(), Value::String(at.timestamp().to_string()));
        self
    }

    /// Reads a flag field back as the moment it was set.
    ///
    /// Accepts the numeric-string form written by [`set_flag`](Self::set_flag)
    /// as well as plain integer values.
    pub fn flag_since(&self, name: &str) -> Option<DateTime<Utc>> {
        let seconds = match self.fields.get(name)? {
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            Value::Number(n) => n.as_i64()?,
            _ => return None,
        };
        DateTime::from_timestamp(seconds, 0)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
