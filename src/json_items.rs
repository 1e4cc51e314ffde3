//! Diffable rows backed by JSON values
use crate::config::ReconcilerConfig;
use crate::errors::ReconcilerError;
use crate::section::SectionEntry;
use crate::types::Diffable;
use serde_json::Value;
use std::borrow::Cow;

/// A JSON row with its identity pulled out up front.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonItem {
    identity: String,
    value: Value,
    /// `value` minus the ignored fields; this is what `is_equal` compares.
    content: Value,
}

impl JsonItem {
    /// Objects are identified by `config.identity_field`; bare strings and
    /// numbers are their own identity.
    pub fn from_value(value: Value, config: &ReconcilerConfig) -> Result<Self, ReconcilerError> {
        let identity = match &value {
            Value::Object(map) => {
                let field = map.get(&config.identity_field).ok_or_else(|| ReconcilerError::KeyError {
                    details: format!("Missing key '{}'", config.identity_field),
                })?;
                scalar_identity(field)?
            }
            other => scalar_identity(other)?,
        };

        let content = match &value {
            Value::Object(map) if !config.ignore_fields.is_empty() => Value::Object(
                map.iter()
                    .filter(|(key, _)| !config.ignore_fields.contains(*key))
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect(),
            ),
            _ => value.clone(),
        };

        Ok(JsonItem {
            identity,
            value,
            content,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Diffable for JsonItem {
    fn diff_identifier(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }

    fn is_equal(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

fn scalar_identity(value: &Value) -> Result<String, ReconcilerError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ReconcilerError::TypeConversionError {
            expected: "string or number identity".into(),
            actual: json_kind(other).into(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_array(value: Value) -> Result<Vec<Value>, ReconcilerError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ReconcilerError::TypeConversionError {
            expected: "array".into(),
            actual: json_kind(&other).into(),
        }),
    }
}

/// Parse a flat JSON array of rows.
pub fn items_from_json(value: Value, config: &ReconcilerConfig) -> Result<Vec<JsonItem>, ReconcilerError> {
    expect_array(value)?
        .into_iter()
        .map(|item| JsonItem::from_value(item, config))
        .collect()
}

/// Parse a JSON array of top-level entries: nested arrays become groups,
/// anything else becomes a single row.
pub fn section_entries_from_json(
    value: Value,
    config: &ReconcilerConfig,
) -> Result<Vec<SectionEntry<JsonItem>>, ReconcilerError> {
    expect_array(value)?
        .into_iter()
        .map(|entry| match entry {
            Value::Array(_) => items_from_json(entry, config).map(SectionEntry::Group),
            single => JsonItem::from_value(single, config).map(SectionEntry::Single),
        })
        .collect()
}
