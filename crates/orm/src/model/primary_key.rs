//! Primary Key values
//!
//! Rows are addressed by an integer or a string key. Zero and the empty string
//! count as "no key", matching how the stored attribute values are read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary key value of one row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    /// Integer key (auto-increment ids)
    Integer(i64),
    /// String key
    Text(String),
}

impl std::fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryKey::Integer(id) => write!(f, "{}", id),
            PrimaryKey::Text(id) => write!(f, "{}", id),
        }
    }
}

impl PrimaryKey {
    /// Read a key from an attribute value; `None` for values that cannot
    /// address a row (null, booleans, objects, zero, empty string)
    pub fn from_json(value: &Value) -> Option<Self> {
        let key = match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => PrimaryKey::Integer(i),
                None => PrimaryKey::Text(n.to_string()),
            },
            Value::String(s) => PrimaryKey::Text(s.clone()),
            _ => return None,
        };
        key.is_valid().then_some(key)
    }

    /// Attribute value for this key
    pub fn to_json(&self) -> Value {
        match self {
            PrimaryKey::Integer(id) => Value::from(*id),
            PrimaryKey::Text(id) => Value::String(id.clone()),
        }
    }

    /// Check if this key can address a row
    pub fn is_valid(&self) -> bool {
        match self {
            PrimaryKey::Integer(id) => *id != 0,
            PrimaryKey::Text(id) => !id.is_empty(),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(id: i64) -> Self {
        PrimaryKey::Integer(id)
    }
}

impl From<i32> for PrimaryKey {
    fn from(id: i32) -> Self {
        PrimaryKey::Integer(id.into())
    }
}

impl From<u64> for PrimaryKey {
    fn from(id: u64) -> Self {
        match i64::try_from(id) {
            Ok(id) => PrimaryKey::Integer(id),
            Err(_) => PrimaryKey::Text(id.to_string()),
        }
    }
}

impl From<&str> for PrimaryKey {
    fn from(id: &str) -> Self {
        PrimaryKey::Text(id.to_string())
    }
}

impl From<String> for PrimaryKey {
    fn from(id: String) -> Self {
        PrimaryKey::Text(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_key_display() {
        assert_eq!(PrimaryKey::Integer(123).to_string(), "123");
        assert_eq!(PrimaryKey::from("abc-1").to_string(), "abc-1");
    }

    #[test]
    fn test_primary_key_validation() {
        assert!(!PrimaryKey::Integer(0).is_valid());
        assert!(PrimaryKey::Integer(1).is_valid());
        assert!(!PrimaryKey::Text(String::new()).is_valid());
        assert!(PrimaryKey::from("x").is_valid());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(PrimaryKey::from_json(&json!(5)), Some(PrimaryKey::Integer(5)));
        assert_eq!(PrimaryKey::from_json(&json!("k")), Some(PrimaryKey::from("k")));
        assert_eq!(
            PrimaryKey::from_json(&json!(u64::MAX)),
            Some(PrimaryKey::Text(u64::MAX.to_string()))
        );
        assert_eq!(PrimaryKey::from_json(&json!(0)), None);
        assert_eq!(PrimaryKey::from_json(&json!("")), None);
        assert_eq!(PrimaryKey::from_json(&Value::Null), None);
        assert_eq!(PrimaryKey::from_json(&json!(true)), None);
    }

    #[test]
    fn test_json_round_trip_and_serde() {
        assert_eq!(PrimaryKey::Integer(9).to_json(), json!(9));
        assert_eq!(PrimaryKey::from("a").to_json(), json!("a"));

        let keys: Vec<PrimaryKey> = serde_json::from_str(r#"[1, "b"]"#).unwrap();
        assert_eq!(keys, vec![PrimaryKey::Integer(1), PrimaryKey::from("b")]);
    }
}
