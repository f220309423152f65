//! Query Conditions and Clauses
//!
//! A `Conditions` value describes the column selection and the clause
//! fragments of one read, aggregate or bulk update. Fragments are inserted
//! verbatim: nothing here validates or escapes them.

use serde::{Deserialize, Serialize};

/// Column selection and clause fragments for one statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub fields: Option<String>,
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    pub group: Option<String>,
    #[serde(rename = "groupDESC")]
    pub group_desc: bool,
    pub having: Option<String>,
    pub order: Option<String>,
    #[serde(rename = "orderDESC")]
    pub order_desc: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub limit: Option<String>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: &str) -> Self {
        self.fields = Some(fields.to_string());
        self
    }

    pub fn where_clause(mut self, condition: &str) -> Self {
        self.where_clause = Some(condition.to_string());
        self
    }

    pub fn group_by(mut self, columns: &str) -> Self {
        self.group = Some(columns.to_string());
        self
    }

    pub fn group_by_desc(mut self, columns: &str) -> Self {
        self.group = Some(columns.to_string());
        self.group_desc = true;
        self
    }

    pub fn having(mut self, condition: &str) -> Self {
        self.having = Some(condition.to_string());
        self
    }

    pub fn order_by(mut self, columns: &str) -> Self {
        self.order = Some(columns.to_string());
        self
    }

    pub fn order_by_desc(mut self, columns: &str) -> Self {
        self.order = Some(columns.to_string());
        self.order_desc = true;
        self
    }

    /// Set the LIMIT fragment (`10`, `20, 10`, ...)
    pub fn limit(mut self, limit: impl std::fmt::Display) -> Self {
        self.limit = Some(limit.to_string());
        self
    }
}

/// Column selection plus the assembled clause string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConditions {
    /// Selected columns, `*` when none were requested
    pub fields: String,
    /// Clause string; each clause starts with a single space
    pub clause: String,
}

/// Assemble the clause string in the order
/// WHERE, GROUP BY [DESC], HAVING, ORDER BY [DESC], LIMIT.
///
/// Absent or empty fragments are omitted, and so is a `0` limit.
pub fn parse_conditions(conditions: Option<&Conditions>) -> ParsedConditions {
    let mut fields = "*".to_string();
    let mut clause = String::new();

    if let Some(conditions) = conditions {
        if let Some(selected) = present(&conditions.fields) {
            fields = selected.to_string();
        }
        if let Some(filter) = present(&conditions.where_clause) {
            clause.push_str(" WHERE ");
            clause.push_str(filter);
        }
        if let Some(group) = present(&conditions.group) {
            clause.push_str(" GROUP BY ");
            clause.push_str(group);
            if conditions.group_desc {
                clause.push_str(" DESC");
            }
        }
        if let Some(having) = present(&conditions.having) {
            clause.push_str(" HAVING ");
            clause.push_str(having);
        }
        if let Some(order) = present(&conditions.order) {
            clause.push_str(" ORDER BY ");
            clause.push_str(order);
            if conditions.order_desc {
                clause.push_str(" DESC");
            }
        }
        // a zero limit means no limit
        if let Some(limit) = present(&conditions.limit).filter(|l| l.trim() != "0") {
            clause.push_str(" LIMIT ");
            clause.push_str(limit);
        }
    }

    ParsedConditions { fields, clause }
}

/// Accept `"limit": 10` as well as `"limit": "5, 10"`
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number for limit, got {}",
            other
        ))),
    }
}

fn present(fragment: &Option<String>) -> Option<&str> {
    fragment.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_conditions() {
        let parsed = parse_conditions(None);
        assert_eq!(parsed.fields, "*");
        assert_eq!(parsed.clause, "");

        let parsed = parse_conditions(Some(&Conditions::new()));
        assert_eq!(parsed.fields, "*");
        assert_eq!(parsed.clause, "");
    }

    #[test]
    fn test_full_clause_order() {
        // builder order deliberately differs from emitted order
        let conditions = Conditions::new()
            .limit(10)
            .order_by_desc("total")
            .having("COUNT(*) > 1")
            .group_by("city")
            .where_clause("age > 18")
            .fields("city, COUNT(*) AS total");

        let parsed = parse_conditions(Some(&conditions));
        assert_eq!(parsed.fields, "city, COUNT(*) AS total");
        assert_eq!(
            parsed.clause,
            " WHERE age > 18 GROUP BY city HAVING COUNT(*) > 1 ORDER BY total DESC LIMIT 10"
        );
    }

    #[test]
    fn test_group_desc_and_partial() {
        let conditions = Conditions::new().group_by_desc("city").limit("5, 10");
        assert_eq!(
            parse_conditions(Some(&conditions)).clause,
            " GROUP BY city DESC LIMIT 5, 10"
        );
    }

    #[test]
    fn test_desc_flags_without_fragment_are_ignored() {
        let conditions = Conditions {
            group_desc: true,
            order_desc: true,
            ..Conditions::default()
        };
        assert_eq!(parse_conditions(Some(&conditions)).clause, "");
    }

    #[test]
    fn test_empty_fragments_are_omitted() {
        let conditions = Conditions::new().where_clause("").fields("").order_by("id");
        let parsed = parse_conditions(Some(&conditions));
        assert_eq!(parsed.fields, "*");
        assert_eq!(parsed.clause, " ORDER BY id");
    }

    #[test]
    fn test_deserialize_numeric_limit() {
        let conditions: Conditions = serde_json::from_str(r#"{"limit": 25}"#).unwrap();
        assert_eq!(parse_conditions(Some(&conditions)).clause, " LIMIT 25");
    }

    #[test]
    fn test_zero_limit_is_omitted() {
        let conditions: Conditions =
            serde_json::from_str(r#"{"limit": 0, "where": "x>1"}"#).unwrap();
        assert_eq!(parse_conditions(Some(&conditions)).clause, " WHERE x>1");

        let built = Conditions::new().order_by("id").limit(0);
        assert_eq!(parse_conditions(Some(&built)).clause, " ORDER BY id");
    }

    #[test]
    fn test_deserialize_wire_key_names() {
        let conditions: Conditions = serde_json::from_str(
            r#"{"where": "x>1", "order": "name", "orderDESC": true, "groupDESC": false, "limit": "3"}"#,
        )
        .unwrap();

        assert_eq!(conditions.where_clause.as_deref(), Some("x>1"));
        assert!(conditions.order_desc);
        assert_eq!(
            parse_conditions(Some(&conditions)).clause,
            " WHERE x>1 ORDER BY name DESC LIMIT 3"
        );
    }
}
