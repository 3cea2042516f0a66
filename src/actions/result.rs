//! actions::result
//!
//! The outcome value every action returns.

use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome of one action invocation.
///
/// Immutable once built; [`ActionResult::success`] and
/// [`ActionResult::failure`] are the only constructors.
///
/// # Example
///
/// ```
/// use gitkit::actions::ActionResult;
/// use serde_json::json;
///
/// let result = ActionResult::success("Successfully pulled from main", json!({"branch": "main"}));
/// assert!(result.is_success());
/// assert_eq!(result.get("branch"), Some(&json!("main")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    success: bool,
    message: String,
    data: Map<String, Value>,
}

impl ActionResult {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self::new(true, message.into(), data)
    }

    pub fn failure(message: impl Into<String>, data: Value) -> Self {
        Self::new(false, message.into(), data)
    }

    fn new(success: bool, message: String, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            success,
            message,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Look up one payload entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
