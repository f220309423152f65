//! Bulk upsert statement (INSERT ... ON DUPLICATE KEY UPDATE)

/// Build a multi-row upsert.
///
/// `rows` holds one already rendered literal per column, in `columns` order.
/// Every column except `primary_key` is refreshed from the incoming row on
/// conflict.
pub fn bulk_upsert(table: &str, columns: &[String], rows: &[Vec<String>], primary_key: &str) -> String {
    let mut sql = format!("INSERT INTO {} ({}) VALUES ", table, columns.join(","));

    let values: Vec<String> = rows
        .iter()
        .map(|row| format!("({})", row.join(",")))
        .collect();
    sql.push_str(&values.join(","));

    sql.push_str(" ON DUPLICATE KEY UPDATE ");
    let updates: Vec<String> = columns
        .iter()
        .filter(|column| column.as_str() != primary_key)
        .map(|column| format!("{}=VALUES({})", column, column))
        .collect();
    sql.push_str(&updates.join(","));

    sql
}
