//! Reconciler settings, loadable from JSON
use crate::errors::ReconcilerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilerConfig {
    /// Object field holding a row's identity.
    pub identity_field: String,
    /// Hand batch-safe scripts to the sink instead of raw ones.
    pub batch_updates: bool,
    /// Object fields that do not count as content changes.
    pub ignore_fields: Vec<String>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        ReconcilerConfig {
            identity_field: "id".to_string(),
            batch_updates: true,
            ignore_fields: Vec::new(),
        }
    }
}

impl ReconcilerConfig {
    pub fn from_json(source: &str) -> Result<Self, ReconcilerError> {
        let config: ReconcilerConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconcilerError> {
        if self.identity_field.is_empty() {
            return Err(ReconcilerError::ConfigError(
                "identity_field must not be empty".into(),
            ));
        }
        if self.ignore_fields.contains(&self.identity_field) {
            return Err(ReconcilerError::ConfigError(format!(
                "identity field '{}' cannot also be ignored",
                self.identity_field
            )));
        }
        Ok(())
    }

    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ReconcilerConfig::from_json("{}").unwrap();
        assert_eq!(config, ReconcilerConfig::default());
        assert!(config.batch_updates);
        assert_eq!(config.identity_field, "id");
    }

    #[test]
    fn fields_override_defaults() {
        let config = ReconcilerConfig::from_json(
            r#"{"identity_field": "pk", "batch_updates": false, "ignore_fields": ["seen_at"]}"#,
        )
        .unwrap();

        assert_eq!(config.identity_field, "pk");
        assert!(!config.batch_updates);
        assert_eq!(config.ignore_fields, vec!["seen_at".to_string()]);
    }

    #[test]
    fn rejects_empty_identity_field() {
        let err = ReconcilerConfig::from_json(r#"{"identity_field": ""}"#).unwrap_err();
        assert!(matches!(err, ReconcilerError::ConfigError(_)));
    }

    #[test]
    fn rejects_ignoring_the_identity_field() {
        let err = ReconcilerConfig::from_json(r#"{"ignore_fields": ["id"]}"#).unwrap_err();
        assert!(matches!(err, ReconcilerError::ConfigError(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ReconcilerConfig::from_json(r#"{"identity": "pk"}"#).unwrap_err();
        assert!(matches!(err, ReconcilerError::SerdeError(_)));
    }
}
