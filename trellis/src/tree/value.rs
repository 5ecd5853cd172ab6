//! Node identity.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique key of a tree node.
///
/// Raw data may use either strings or integers as node values, so both are
/// kept distinct: `Str("1")` and `Int(1)` are different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Int(i64),
    Str(String),
}

impl NodeValue {
    /// Generate a fresh value for items that do not carry one.
    pub(crate) fn generate() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self::Str(format!("t{}", COUNTER.fetch_add(1, Ordering::SeqCst) + 1))
    }

    /// Map a raw JSON scalar to a node value.
    ///
    /// `null` maps to `None` so the caller can fall back to a generated value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Str(n.to_string())),
            },
            other => Some(Self::Str(other.to_string())),
        }
    }

    /// Convert back to a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for NodeValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for NodeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for NodeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for NodeValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(NodeValue::from_json(&json!("a")), Some(NodeValue::from("a")));
        assert_eq!(NodeValue::from_json(&json!(7)), Some(NodeValue::Int(7)));
        assert_eq!(NodeValue::from_json(&json!(1.5)), Some(NodeValue::from("1.5")));
        assert_eq!(NodeValue::from_json(&json!(true)), Some(NodeValue::from("true")));
        assert_eq!(NodeValue::from_json(&Value::Null), None);
    }

    #[test]
    fn test_generated_values_are_distinct() {
        let a = NodeValue::generate();
        let b = NodeValue::generate();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with('t'));
    }

    #[test]
    fn test_string_and_int_are_distinct() {
        assert_ne!(NodeValue::from("1"), NodeValue::from(1));
    }
}
