//! MySQL Driver Implementation
//!
//! Implements the `Connection` contract on top of a sqlx MySQL pool. Statements
//! are sent as plain text (no bound parameters), exactly as the models and
//! collections build them.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Either, Executor, Row as SqlxRow, TypeInfo, ValueRef};

use super::core::{Connection, QueryResult, Row};
use crate::config::DriverConfig;
use crate::error::{DriverError, ModelError, ModelResult};

/// sqlx backed MySQL driver handle
#[derive(Debug, Clone)]
pub struct MySqlDriver {
    pool: MySqlPool,
}

impl MySqlDriver {
    /// Open a pool using the given configuration
    pub async fn connect(config: &DriverConfig) -> ModelResult<Self> {
        config.validate()?;

        tracing::debug!(
            "Creating MySQL pool: max_connections={}, acquire_timeout={}s",
            config.max_connections,
            config.acquire_timeout
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create MySQL pool: {}", e);
                ModelError::Driver(e.into())
            })?;

        Ok(Self { pool })
    }

    /// Wrap an existing sqlx pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Connection for MySqlDriver {
    async fn query(&self, sql: &str) -> Result<QueryResult, DriverError> {
        let mut result = QueryResult::default();
        let mut stream = self.pool.fetch_many(sql);

        while let Some(step) = stream.try_next().await.map_err(|e| {
            tracing::error!("MySQL statement failed: {}", e);
            DriverError::from(e)
        })? {
            match step {
                Either::Left(done) => {
                    result.affected_rows += done.rows_affected();
                    // sqlx always connects with CLIENT_FOUND_ROWS and does not expose the
                    // OK packet info string, so this is the matched row count. An UPDATE
                    // that rewrites identical values still reports its rows here.
                    result.changed_rows += done.rows_affected();
                    if done.last_insert_id() != 0 {
                        result.insert_id = done.last_insert_id();
                    }
                }
                Either::Right(row) => result.rows.push(row_to_json(&row)?),
            }
        }

        Ok(result)
    }
}

/// Convert a MySQL row into a JSON map keyed by column name
fn row_to_json(row: &MySqlRow) -> Result<Row, DriverError> {
    let mut map = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), column_to_json(row, index)?);
    }
    Ok(map)
}

fn column_to_json(row: &MySqlRow, index: usize) -> Result<JsonValue, DriverError> {
    let raw = row.try_get_raw(index).map_err(DriverError::from)?;
    if raw.is_null() {
        return Ok(JsonValue::Null);
    }

    let type_name = row.columns()[index].type_info().name().to_string();
    let decode_err = |e: sqlx::Error| {
        DriverError::new(format!(
            "Failed to decode column {} ({}): {}",
            index, type_name, e
        ))
    };

    let value = match type_name.as_str() {
        name if name.ends_with("UNSIGNED") => {
            let value: u64 = row.try_get_unchecked(index).map_err(decode_err)?;
            JsonValue::from(value)
        }
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            let value: i64 = row.try_get_unchecked(index).map_err(decode_err)?;
            JsonValue::from(value)
        }
        "FLOAT" | "DOUBLE" => {
            let value: f64 = row.try_get_unchecked(index).map_err(decode_err)?;
            serde_json::Number::from_f64(value)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null)
        }
        "DATETIME" | "TIMESTAMP" => {
            let value: chrono::NaiveDateTime =
                row.try_get_unchecked(index).map_err(decode_err)?;
            JsonValue::String(value.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        "DATE" => {
            let value: chrono::NaiveDate = row.try_get_unchecked(index).map_err(decode_err)?;
            JsonValue::String(value.format("%Y-%m-%d").to_string())
        }
        "JSON" => {
            let value: sqlx::types::Json<JsonValue> =
                row.try_get_unchecked(index).map_err(decode_err)?;
            value.0
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            let value: Vec<u8> = row.try_get_unchecked(index).map_err(decode_err)?;
            match String::from_utf8(value) {
                Ok(text) => JsonValue::String(text),
                Err(e) => JsonValue::Array(
                    e.into_bytes().into_iter().map(JsonValue::from).collect(),
                ),
            }
        }
        // DECIMAL, TIME, text types and anything else come back as text
        _ => {
            let value: String = row.try_get_unchecked(index).map_err(decode_err)?;
            JsonValue::String(value)
        }
    };

    Ok(value)
}
