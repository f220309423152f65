//! SQL Statement Generation
//!
//! Pure builders for every statement the models and collections issue. Callers
//! pass already escaped fragments; these functions only assemble them, so the
//! emitted text is stable and can be asserted byte for byte.

pub mod upsert;

pub use upsert::bulk_upsert;

/// `SELECT <fields> FROM <table> WHERE <key>=<id>`
pub fn select_by_id(fields: &str, table: &str, key: &str, id: &str) -> String {
    format!("SELECT {} FROM {} WHERE {}={}", fields, table, key, id)
}

/// `SELECT <fields> FROM <table> WHERE <key> IN (<ids>)`
pub fn select_in(fields: &str, table: &str, key: &str, escaped_ids: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} IN ({})",
        fields, table, key, escaped_ids
    )
}

/// `SELECT <fields> FROM <table><clause>`
pub fn select_with_clause(fields: &str, table: &str, clause: &str) -> String {
    format!("SELECT {} FROM {}{}", fields, table, clause)
}

/// `SELECT COUNT(*) FROM <table><clause>`
pub fn count(table: &str, clause: &str) -> String {
    format!("SELECT COUNT(*) FROM {}{}", table, clause)
}

/// `INSERT INTO <table> SET <assignments>`
pub fn insert_set(table: &str, escaped_object: &str) -> String {
    format!("INSERT INTO {} SET {}", table, escaped_object)
}

/// `UPDATE <table> SET <assignments> WHERE <key>=<id>`
pub fn update_by_id(table: &str, escaped_object: &str, key: &str, escaped_id: &str) -> String {
    format!(
        "UPDATE {} SET {} WHERE {}={}",
        table, escaped_object, key, escaped_id
    )
}

/// `UPDATE <table> SET <assignments><clause>`
pub fn update_with_clause(table: &str, escaped_object: &str, clause: &str) -> String {
    format!("UPDATE {} SET {}{}", table, escaped_object, clause)
}

/// `DELETE FROM <table> WHERE <key>=<id>`
pub fn delete_by_id(table: &str, key: &str, escaped_id: &str) -> String {
    format!("DELETE FROM {} WHERE {}={}", table, key, escaped_id)
}

/// `DELETE from <table> WHERE <key> IN (<ids>)`
///
/// The lowercase `from` is part of the established statement text.
pub fn delete_in(table: &str, key: &str, escaped_ids: &str) -> String {
    format!("DELETE from {} WHERE {} IN ({})", table, key, escaped_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_shapes() {
        assert_eq!(
            select_by_id("*", "users", "id", "5"),
            "SELECT * FROM users WHERE id=5"
        );
        assert_eq!(
            select_in("id, name", "users", "id", "1, 2"),
            "SELECT id, name FROM users WHERE id IN (1, 2)"
        );
        assert_eq!(
            select_with_clause("*", "users", " WHERE x>1 LIMIT 2"),
            "SELECT * FROM users WHERE x>1 LIMIT 2"
        );
        assert_eq!(select_with_clause("*", "users", ""), "SELECT * FROM users");
        assert_eq!(count("users", ""), "SELECT COUNT(*) FROM users");
    }

    #[test]
    fn test_write_shapes() {
        assert_eq!(
            insert_set("users", "`name` = 'x'"),
            "INSERT INTO users SET `name` = 'x'"
        );
        assert_eq!(
            update_by_id("users", "`name` = 'y'", "id", "3"),
            "UPDATE users SET `name` = 'y' WHERE id=3"
        );
        assert_eq!(
            update_with_clause("users", "`active` = false", " WHERE age > 90"),
            "UPDATE users SET `active` = false WHERE age > 90"
        );
        assert_eq!(
            delete_by_id("users", "id", "'abc'"),
            "DELETE FROM users WHERE id='abc'"
        );
        assert_eq!(
            delete_in("users", "id", "1, 2, 3"),
            "DELETE from users WHERE id IN (1, 2, 3)"
        );
    }
}
