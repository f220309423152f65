//! Core Driver Traits
//!
//! Defines the driver contract consumed by models and collections: run one
//! SQL string, report rows and counters, and escape values into literals.
//! Connection lifecycle (open, close, pooling) belongs to the driver.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::error::{DriverError, ModelResult};
use crate::security;

/// One result row, keyed by column name in result order
pub type Row = Map<String, JsonValue>;

/// Shared driver handle
pub type ConnectionRef = Arc<dyn Connection>;

/// Outcome of a single statement as reported by the driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Result rows (empty for statements that return none)
    pub rows: Vec<Row>,
    /// Auto-increment id generated by an INSERT, `0` when none
    pub insert_id: u64,
    /// Rows matched by a write statement
    pub affected_rows: u64,
    /// Rows whose values actually changed
    pub changed_rows: u64,
}

impl QueryResult {
    /// Result carrying rows only
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Result of an INSERT that generated `insert_id`
    pub fn inserted(insert_id: u64) -> Self {
        Self {
            insert_id,
            affected_rows: 1,
            ..Self::default()
        }
    }

    /// Result of an UPDATE touching `changed_rows` rows
    pub fn changed(changed_rows: u64) -> Self {
        Self {
            affected_rows: changed_rows,
            changed_rows,
            ..Self::default()
        }
    }

    /// Result of a DELETE removing `affected_rows` rows
    pub fn affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            ..Self::default()
        }
    }

    /// First row, if any
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }
}

/// Driver handle: executes SQL strings and escapes values
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute one statement and report its rows and counters
    async fn query(&self, sql: &str) -> Result<QueryResult, DriverError>;

    /// Escape a value into a SQL literal
    fn escape(&self, value: &JsonValue) -> String {
        security::escape_value(value)
    }
}

/// Run one statement through `connection`, logging its SQL
pub async fn execute(connection: &dyn Connection, sql: &str) -> ModelResult<QueryResult> {
    tracing::debug!("Executing SQL: {}", sql);
    let result = connection.query(sql).await?;
    tracing::debug!(
        "Statement done: {} rows, insert_id={}, affected={}, changed={}",
        result.rows.len(),
        result.insert_id,
        result.affected_rows,
        result.changed_rows
    );
    Ok(result)
}
