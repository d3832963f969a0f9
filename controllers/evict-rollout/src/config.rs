//! Configuration loaded from environment variables.

use crate::candidates::AnnotationSelector;
use crate::error::ControllerError;
use std::env;

/// Annotation key pods set to opt in
pub const DEFAULT_ANNOTATION_KEY: &str = "evict-to-rollout";

/// Annotation value pods set to opt in
pub const DEFAULT_ANNOTATION_VALUE: &str = "true";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Options consumed by a single reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Pods must carry this annotation pair to be considered
    pub selector: AnnotationSelector,
    /// Log intended restarts without writing to the cluster
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            selector: AnnotationSelector::new(DEFAULT_ANNOTATION_KEY, DEFAULT_ANNOTATION_VALUE),
            dry_run: false,
        }
    }
}

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub run: RunConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// - `ANNOTATION_KEY` (default `evict-to-rollout`)
    /// - `ANNOTATION_VALUE` (default `true`)
    /// - `DRY_RUN` (default `false`)
    /// - `LOG_FORMAT` (`text` or `json`, default `text`)
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("ANNOTATION_KEY").unwrap_or_else(|| DEFAULT_ANNOTATION_KEY.to_string());
        if key.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "ANNOTATION_KEY must not be empty".to_string(),
            ));
        }
        let value = lookup("ANNOTATION_VALUE").unwrap_or_else(|| DEFAULT_ANNOTATION_VALUE.to_string());

        let dry_run = match lookup("DRY_RUN") {
            Some(raw) => parse_bool("DRY_RUN", &raw)?,
            None => false,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("" | "text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ControllerError::InvalidConfig(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )));
            }
        };

        Ok(Self {
            run: RunConfig {
                selector: AnnotationSelector::new(key, value),
                dry_run,
            },
            log_format,
        })
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ControllerError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(ControllerError::InvalidConfig(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
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
        let config = Config::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config, Config::default());
        assert_eq!(config.run.selector.key, "evict-to-rollout");
        assert_eq!(config.run.selector.value, "true");
        assert!(!config.run.dry_run);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ANNOTATION_KEY", "example.com/drain-restart"),
            ("ANNOTATION_VALUE", "enabled"),
            ("DRY_RUN", "yes"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .expect("overrides are valid");

        assert_eq!(config.run.selector, AnnotationSelector::new("example.com/drain-restart", "enabled"));
        assert!(config.run.dry_run);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_dry_run_values() {
        for (raw, expected) in [("true", true), ("1", true), ("FALSE", false), ("0", false), ("no", false)] {
            let config = Config::from_lookup(lookup_from(&[("DRY_RUN", raw)]))
                .expect("valid boolean");
            assert_eq!(config.run.dry_run, expected, "DRY_RUN={}", raw);
        }
    }

    #[test]
    fn test_invalid_dry_run() {
        let result = Config::from_lookup(lookup_from(&[("DRY_RUN", "maybe")]));
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_annotation_key_rejected() {
        let result = Config::from_lookup(lookup_from(&[("ANNOTATION_KEY", "  ")]));
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_log_format() {
        let result = Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(ControllerError::InvalidConfig(_))));
    }
}
