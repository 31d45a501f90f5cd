//! Synchronizer configuration
//!
//! Two entry points: [`Config::apply_options`] merges a loosely shaped
//! options object the way page scripts pass it, [`Config::from_json_str`]
//! reads a strict configuration file.

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Default class toggled on labels
pub const DEFAULT_FLOATING_CLASS: &str = "floating";

/// What a scan does when an input has no `<label for>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingLabel {
    /// Skip that input and keep scanning
    #[default]
    SkipInput,
    /// Stop visiting further inputs
    StopScan,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Class added to a label while its input has a value
    pub floating_class_name: String,
    /// Listen once on `<body>` instead of on every input
    pub delegate_events: bool,
    /// Scan behaviour for inputs without a label
    pub missing_label: MissingLabel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            floating_class_name: DEFAULT_FLOATING_CLASS.to_string(),
            delegate_events: false,
            missing_label: MissingLabel::default(),
        }
    }
}

impl Config {
    pub fn with_floating_class_name(mut self, class: impl Into<String>) -> Self {
        self.floating_class_name = class.into();
        self
    }

    pub fn with_delegate_events(mut self, delegate: bool) -> Self {
        self.delegate_events = delegate;
        self
    }

    pub fn with_missing_label(mut self, policy: MissingLabel) -> Self {
        self.missing_label = policy;
        self
    }

    /// Parse a configuration file. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if is_valid_class_name(&self.floating_class_name) {
            Ok(())
        } else {
            Err(Error::InvalidClassName(self.floating_class_name.clone()))
        }
    }

    /// Merge the recognized keys of an options object over this config.
    ///
    /// Only `floatingClassName` (string) and `delegateEvents` (bool) are
    /// read. Anything else, including a non-object `options`, is ignored.
    /// Returns the number of options applied.
    pub fn apply_options(&mut self, options: &Value) -> usize {
        let Some(map) = options.as_object() else {
            if !options.is_null() {
                tracing::debug!("options are not an object, keeping configuration");
            }
            return 0;
        };

        let mut applied = 0;
        for (key, value) in map {
            match key.as_str() {
                "floatingClassName" => match value.as_str() {
                    Some(class) if is_valid_class_name(class) => {
                        self.floating_class_name = class.to_string();
                        applied += 1;
                    }
                    _ => tracing::warn!("ignoring floatingClassName {}: expected a class name", value),
                },
                "delegateEvents" => match value.as_bool() {
                    Some(delegate) => {
                        self.delegate_events = delegate;
                        applied += 1;
                    }
                    None => tracing::warn!("ignoring delegateEvents {}: expected a boolean", value),
                },
                other => tracing::trace!("ignoring unknown option `{}`", other),
            }
        }
        applied
    }
}

/// A single class token: non-empty, no whitespace
fn is_valid_class_name(class: &str) -> bool {
    !class.is_empty() && !class.chars().any(|c| c.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.floating_class_name, "floating");
        assert!(!config.delegate_events);
        assert_eq!(config.missing_label, MissingLabel::SkipInput);
    }

    #[test]
    fn test_apply_recognized_options() {
        let mut config = Config::default();
        let applied = config.apply_options(&json!({ "floatingClassName": "active", "delegateEvents": true }));

        assert_eq!(applied, 2);
        assert_eq!(config.floating_class_name, "active");
        assert!(config.delegate_events);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut config = Config::default();
        let applied = config.apply_options(&json!({ "color": "red", "missingLabel": "stopScan" }));

        assert_eq!(applied, 0);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_non_object_keeps_config() {
        let mut config = Config::default().with_floating_class_name("up");
        for options in [json!(null), json!(42), json!("floating"), json!([true])] {
            assert_eq!(config.apply_options(&options), 0);
        }
        assert_eq!(config.floating_class_name, "up");
    }

    #[test]
    fn test_wrong_types_ignored() {
        let mut config = Config::default();
        let applied = config.apply_options(&json!({
            "floatingClassName": 5,
            "delegateEvents": "yes"
        }));
        assert_eq!(applied, 0);
        assert_eq!(config, Config::default());

        config.apply_options(&json!({ "floatingClassName": "two words" }));
        assert_eq!(config.floating_class_name, "floating");
    }

    #[test]
    fn test_from_json_str() {
        let config = Config::from_json_str(r#"{ "floatingClassName": "raised", "missingLabel": "stopScan" }"#).unwrap();
        assert_eq!(config.floating_class_name, "raised");
        assert!(!config.delegate_events);
        assert_eq!(config.missing_label, MissingLabel::StopScan);
    }

    #[test]
    fn test_from_json_str_errors() {
        assert!(matches!(Config::from_json_str("{ not json"), Err(Error::Config(_))));
        assert!(matches!(
            Config::from_json_str(r#"{ "floatingClassName": "" }"#),
            Err(Error::InvalidClassName(_))
        ));
    }
}
