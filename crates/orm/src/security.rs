//! MySQL literal and identifier escaping
//!
//! This module provides functions for:
//! - Escaping values into MySQL literals (strings, numbers, lists, objects)
//! - Escaping identifiers (table names, column names)
//! - Rendering values the way the legacy bulk upsert inlines them
//!
//! The rules follow the `escape` function of the Node.js `mysql` driver, so
//! that `Connection::escape` produces the same text for the same input.

use serde_json::{Map, Value};

/// Escape a value into a MySQL literal
///
/// - `null` becomes `NULL`
/// - booleans become `true` / `false`
/// - numbers are written verbatim
/// - strings are single-quoted with special characters backslash-escaped
/// - arrays become a `, ` separated list (nested arrays are parenthesized)
/// - objects become `` `key` = value `` pairs separated by `, `
///
/// # Examples
/// ```
/// use mysql_model::security::escape_value;
/// use serde_json::json;
///
/// assert_eq!(escape_value(&json!("it's")), "'it\\'s'");
/// assert_eq!(escape_value(&json!([1, 2, 3])), "1, 2, 3");
/// assert_eq!(escape_value(&json!({"name": "x"})), "`name` = 'x'");
/// ```
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape_string(s),
        Value::Array(items) => escape_list(items),
        Value::Object(map) => escape_object(map),
    }
}

/// Escape a list of values as a comma separated literal list
pub fn escape_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Array(nested) => format!("({})", escape_list(nested)),
            other => escape_value(other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape an attribute map as a `SET`-style assignment list
pub fn escape_object(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| {
            let literal = match value {
                // nested objects are stored as their JSON text
                Value::Object(_) => escape_string(&value.to_string()),
                other => escape_value(other),
            };
            format!("{} = {}", escape_identifier(key), literal)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape a string into a single-quoted MySQL literal
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => result.push_str("\\0"),
            '\x08' => result.push_str("\\b"),
            '\t' => result.push_str("\\t"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\x1a' => result.push_str("\\Z"),
            '"' => result.push_str("\\\""),
            '\'' => result.push_str("\\'"),
            '\\' => result.push_str("\\\\"),
            _ => result.push(ch),
        }
    }
    result.push('\'');
    result
}

/// Escape a SQL identifier (table name, column name, etc.)
///
/// Backticks inside the identifier are doubled and qualified names are
/// quoted part by part.
///
/// # Examples
/// ```
/// use mysql_model::security::escape_identifier;
///
/// assert_eq!(escape_identifier("users"), "`users`");
/// assert_eq!(escape_identifier("users.name"), "`users`.`name`");
/// assert_eq!(escape_identifier("odd`name"), "`odd``name`");
/// ```
pub fn escape_identifier(identifier: &str) -> String {
    identifier
        .split('.')
        .map(|part| format!("`{}`", part.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a value the way the legacy bulk upsert inlines it: raw text wrapped
/// in single quotes, with no escaping applied.
///
/// A missing attribute renders as `undefined`, `null` as `null`, arrays as
/// their comma joined elements and objects as `[object Object]`.
pub fn legacy_quoted(value: Option<&Value>) -> String {
    format!("'{}'", legacy_text(value))
}

fn legacy_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => legacy_text(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_scalars() {
        assert_eq!(escape_value(&Value::Null), "NULL");
        assert_eq!(escape_value(&json!(true)), "true");
        assert_eq!(escape_value(&json!(42)), "42");
        assert_eq!(escape_value(&json!(-1.5)), "-1.5");
        assert_eq!(escape_value(&json!("plain")), "'plain'");
    }

    #[test]
    fn test_escape_string_special_characters() {
        assert_eq!(escape_string("a'b"), "'a\\'b'");
        assert_eq!(escape_string("a\"b"), "'a\\\"b'");
        assert_eq!(escape_string("back\\slash"), "'back\\\\slash'");
        assert_eq!(escape_string("line\nbreak\r"), "'line\\nbreak\\r'");
        assert_eq!(escape_string("nul\0tab\t"), "'nul\\0tab\\t'");
        assert_eq!(escape_string("ctrl\x1az"), "'ctrl\\Zz'");
    }

    #[test]
    fn test_escape_injection_attempt_stays_quoted() {
        let escaped = escape_value(&json!("1'; DROP TABLE users; --"));
        assert_eq!(escaped, "'1\\'; DROP TABLE users; --'");
    }

    #[test]
    fn test_escape_lists() {
        assert_eq!(escape_value(&json!([1, 2, 3])), "1, 2, 3");
        assert_eq!(escape_value(&json!(["a", 2])), "'a', 2");
        assert_eq!(escape_value(&json!([[1, 2], [3, 4]])), "(1, 2), (3, 4)");
        assert_eq!(escape_value(&json!([])), "");
    }

    #[test]
    fn test_escape_object_keeps_insertion_order() {
        let mut map = Map::new();
        map.insert("name".to_string(), json!("x"));
        map.insert("age".to_string(), json!(3));
        map.insert("note".to_string(), Value::Null);

        assert_eq!(escape_object(&map), "`name` = 'x', `age` = 3, `note` = NULL");
    }

    #[test]
    fn test_escape_object_nested_values() {
        let mut map = Map::new();
        map.insert("meta".to_string(), json!({"k": 1}));
        map.insert("tags".to_string(), json!(["a", "b"]));

        assert_eq!(
            escape_object(&map),
            "`meta` = '{\\\"k\\\":1}', `tags` = 'a', 'b'"
        );
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("user_table"), "`user_table`");
        assert_eq!(escape_identifier("db.table"), "`db`.`table`");
        assert_eq!(escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_legacy_quoted_does_not_escape() {
        assert_eq!(legacy_quoted(Some(&json!("it's"))), "'it's'");
        assert_eq!(legacy_quoted(Some(&json!(7))), "'7'");
        assert_eq!(legacy_quoted(Some(&Value::Null)), "'null'");
        assert_eq!(legacy_quoted(None), "'undefined'");
        assert_eq!(legacy_quoted(Some(&json!([1, null, "b"]))), "'1,,b'");
        assert_eq!(legacy_quoted(Some(&json!({"a": 1}))), "'[object Object]'");
    }
}
