//! Typed access to the argument bag of a tool call.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: HashMap<String, Value>,
}

impl ToolArgs {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Returns the string under `key`, or `MissingArgument(missing)` when it is absent or
    /// not a string.
    pub fn require_string(&self, key: &str, missing: &str) -> Result<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::missing(missing))
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Numbers may arrive as JSON numbers or numeric strings. Anything else yields the
    /// default.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }
}

impl From<Option<HashMap<String, Value>>> for ToolArgs {
    fn from(values: Option<HashMap<String, Value>>) -> Self {
        Self::new(values.unwrap_or_default())
    }
}

impl<const N: usize> From<[(&str, Value); N]> for ToolArgs {
    fn from(pairs: [(&str, Value); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_string_reports_given_message() {
        let args = ToolArgs::from([("name", json!("web"))]);
        assert_eq!(args.require_string("name", "Provide name for pod").unwrap(), "web");

        let err = args
            .require_string("namespace", "Provide namespace for pod")
            .unwrap_err();
        assert_eq!(err.to_string(), "Provide namespace for pod");
    }

    #[test]
    fn test_require_string_rejects_non_string() {
        let args = ToolArgs::from([("name", json!(3))]);
        assert!(args.require_string("name", "Provide name for pod").is_err());
    }

    #[test]
    fn test_get_int_accepts_numbers_and_strings() {
        let args = ToolArgs::from([
            ("replica", json!(3)),
            ("tailLine", json!("25")),
            ("svcPort", json!(443.0)),
            ("bogus", json!("many")),
        ]);
        assert_eq!(args.get_int("replica", -1), 3);
        assert_eq!(args.get_int("tailLine", 100), 25);
        assert_eq!(args.get_int("svcPort", 8080), 443);
        assert_eq!(args.get_int("bogus", 7), 7);
        assert_eq!(args.get_int("absent", -1), -1);
    }

    #[test]
    fn test_get_string_default() {
        let args = ToolArgs::default();
        assert_eq!(args.get_string("containerPorts", "http:8080"), "http:8080");
    }
}
