//! # Function Module
//!
//! YAML document that plays the role of a loadable script: it names the
//! functions it exports and binds each one to a registered handler class.
//!
//! ```yaml
//! name: system-metrics
//! description: Host metrics summary
//! functions:
//!   handler:
//!     handler_class: system_metrics
//!     handler_config:
//!       window_seconds: 60
//! ```

use super::errors::{LoadError, LoadResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionModule {
    /// Module name, for logging only
    pub name: Option<String>,

    pub description: Option<String>,

    /// Exported functions keyed by function name
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDefinition>,
}

/// One exported function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// The registered class that implements the function
    pub handler_class: String,

    pub description: Option<String>,

    /// Immutable configuration handed to the handler through its context
    #[serde(default)]
    pub handler_config: Map<String, Value>,
}

impl FunctionModule {
    /// Parse a module document; `origin` is used in error messages
    pub fn parse(text: &str, origin: &str) -> LoadResult<Self> {
        serde_yaml::from_str(text).map_err(|e| LoadError::module_parse(origin, e.to_string()))
    }

    /// Look up an exported function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    /// Names of all exported functions, sorted
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODULE: &str = r#"
name: system-metrics
functions:
  handler:
    handler_class: system_metrics
    handler_config:
      window_seconds: 60
      label: hosts
  noop:
    handler_class: noop
"#;

    #[test]
    fn test_parse_module() {
        let module = FunctionModule::parse(MODULE, "function.yaml").unwrap();
        assert_eq!(module.name.as_deref(), Some("system-metrics"));
        assert_eq!(module.function_names(), vec!["handler", "noop"]);

        let handler = module.function("handler").unwrap();
        assert_eq!(handler.handler_class, "system_metrics");
        assert_eq!(handler.handler_config.get("window_seconds"), Some(&json!(60)));
        assert_eq!(handler.handler_config.get("label"), Some(&json!("hosts")));

        assert!(module.function("noop").unwrap().handler_config.is_empty());
        assert!(module.function("missing").is_none());
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = FunctionModule::parse("functions: [unclosed", "bad.yaml").unwrap_err();
        match err {
            LoadError::ModuleParse { origin, .. } => assert_eq!(origin, "bad.yaml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_function_without_class_is_rejected() {
        let err = FunctionModule::parse("functions:\n  handler:\n    description: x\n", "m.yaml")
            .unwrap_err();
        assert!(matches!(err, LoadError::ModuleParse { .. }));
    }
}
