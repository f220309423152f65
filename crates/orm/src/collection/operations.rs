//! Batch operations of a collection
//!
//! Every operation issues one statement (`update` adds a follow-up `sync`)
//! built from the effective configuration, a `Conditions` value and/or the
//! current members, and updates the member set from the result. A failed
//! statement leaves the member set untouched.

use serde_json::Value;

use super::{DestroyTarget, MysqlCollection};
use crate::backends::{execute, QueryResult, Row};
use crate::conditions::{parse_conditions, Conditions};
use crate::diagnostics::Diagnostic;
use crate::error::{ModelError, ModelResult};
use crate::model::{Attributes, PrimaryKey, UpsertEscaping};
use crate::security;
use crate::sql;

/// Column holding the aggregate of a count statement
const COUNT_COLUMN: &str = "COUNT(*)";

impl MysqlCollection {
    /// Reload the current members by key and replace the member set with
    /// the rows found. Only `fields` of `conditions` is used.
    pub async fn sync(&mut self, conditions: Option<&Conditions>) -> ModelResult<Vec<Row>> {
        let connection = self.resolved.require_connection()?;
        let parsed = parse_conditions(conditions);

        let ids = self.ids();
        if ids.is_empty() {
            tracing::debug!("Nothing to sync in {}", self.resolved.table_name);
            return Ok(Vec::new());
        }

        let id_list = Value::Array(ids.iter().map(PrimaryKey::to_json).collect());
        let statement = sql::select_in(
            &parsed.fields,
            &self.resolved.table_name,
            &self.resolved.primary_key,
            &connection.escape(&id_list),
        );
        let result = execute(connection.as_ref(), &statement).await?;

        self.set(result.rows.clone()).await?;
        Ok(result.rows)
    }

    /// Insert one row, set its primary key to the generated id and add it
    /// as a member
    pub async fn create(&mut self, mut data: Attributes) -> ModelResult<Attributes> {
        let connection = self.resolved.require_connection()?;

        let statement = sql::insert_set(
            &self.resolved.table_name,
            &connection.escape(&Value::Object(data.clone())),
        );
        let result = execute(connection.as_ref(), &statement).await?;
        if result.insert_id == 0 {
            return Err(ModelError::NoRowInserted);
        }

        data.insert(self.resolved.primary_key.clone(), Value::from(result.insert_id));
        self.add(data.clone()).await?;
        Ok(data)
    }

    /// Write every member in one multi-row upsert.
    ///
    /// Columns are taken from the first member. With
    /// `UpsertEscaping::Legacy` values are inlined unescaped.
    pub async fn save(&mut self) -> ModelResult<()> {
        let connection = self.resolved.require_connection()?;
        let first = self.models.first().ok_or(ModelError::NoModels)?;
        let columns: Vec<String> = first.attributes().keys().cloned().collect();

        let escaping = self.upsert_escaping();
        let rows: Vec<Vec<String>> = self
            .models
            .iter()
            .map(|model| {
                columns
                    .iter()
                    .map(|column| match escaping {
                        UpsertEscaping::Legacy => security::legacy_quoted(model.get(column)),
                        UpsertEscaping::Escaped => {
                            connection.escape(model.get(column).unwrap_or(&Value::Null))
                        }
                    })
                    .collect()
            })
            .collect();

        if escaping == UpsertEscaping::Legacy {
            self.resolved.diagnostics.emit(&Diagnostic::UnescapedUpsert {
                table: self.resolved.table_name.clone(),
            });
        }

        let statement = sql::bulk_upsert(
            &self.resolved.table_name,
            &columns,
            &rows,
            &self.resolved.primary_key,
        );
        execute(connection.as_ref(), &statement).await?;
        Ok(())
    }

    /// Update every row matching `conditions`, then `sync` the members.
    ///
    /// If the follow-up `sync` fails its error is returned while the rows in
    /// the table stay updated.
    pub async fn update(&mut self, values: Attributes, conditions: Option<&Conditions>) -> ModelResult<()> {
        let connection = self.resolved.require_connection()?;
        let parsed = parse_conditions(conditions);

        let statement = sql::update_with_clause(
            &self.resolved.table_name,
            &connection.escape(&Value::Object(values)),
            &parsed.clause,
        );
        let result = execute(connection.as_ref(), &statement).await?;
        if result.changed_rows == 0 {
            return Err(ModelError::NoRowsChanged);
        }

        self.sync(conditions).await?;
        Ok(())
    }

    /// Delete one row, one model, or a batch of rows by key and drop them
    /// from the member set
    pub async fn destroy(&mut self, target: DestroyTarget) -> ModelResult<QueryResult> {
        match target {
            DestroyTarget::ByIdentifier(id) => {
                let mut model = self.new_model(Attributes::new());
                let result = model.destroy(Some(id.clone())).await?;
                self.remove(&[id]).await?;
                Ok(result)
            }
            DestroyTarget::ByInstance(mut model) => {
                let id = model.effective_id(None).ok_or_else(|| {
                    ModelError::InvalidArgument("pass models with an id.".to_string())
                })?;
                let result = model.destroy(None).await?;
                self.remove(&[id]).await?;
                Ok(result)
            }
            DestroyTarget::ByIdentifierList(ids) => {
                if ids.is_empty() {
                    return Err(ModelError::InvalidArgument("pass models.".to_string()));
                }
                let connection = self.resolved.require_connection()?;

                let id_list = Value::Array(ids.iter().map(PrimaryKey::to_json).collect());
                let statement = sql::delete_in(
                    &self.resolved.table_name,
                    &self.resolved.primary_key,
                    &connection.escape(&id_list),
                );
                let result = execute(connection.as_ref(), &statement).await?;
                if result.affected_rows == 0 {
                    return Err(ModelError::NoRowsRemoved);
                }

                self.remove(&ids).await?;
                Ok(result)
            }
        }
    }

    /// Count rows matching `conditions`
    pub async fn count(&self, conditions: Option<&Conditions>) -> ModelResult<u64> {
        let connection = self.resolved.require_connection()?;
        let parsed = parse_conditions(conditions);

        let statement = sql::count(&self.resolved.table_name, &parsed.clause);
        let result = execute(connection.as_ref(), &statement).await?;

        let value = result
            .first_row()
            .and_then(|row| row.get(COUNT_COLUMN))
            .ok_or_else(|| {
                ModelError::Serialization(format!("{} missing from count result", COUNT_COLUMN))
            })?;

        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ModelError::Serialization(format!("Invalid count value: {}", value)))
    }

    /// Load the rows matching `conditions` and replace the member set
    pub async fn fetch(&mut self, conditions: Option<&Conditions>) -> ModelResult<Vec<Row>> {
        let connection = self.resolved.require_connection()?;
        let parsed = parse_conditions(conditions);

        let statement =
            sql::select_with_clause(&parsed.fields, &self.resolved.table_name, &parsed.clause);
        let result = execute(connection.as_ref(), &statement).await?;

        self.set(result.rows.clone()).await?;
        Ok(result.rows)
    }

    /// Deprecated alias of [`MysqlCollection::fetch`]
    pub async fn find(&mut self, conditions: Option<&Conditions>) -> ModelResult<Vec<Row>> {
        self.deprecated("find", Some("fetch"));
        self.fetch(conditions).await
    }

    /// Run an arbitrary statement. Deprecated; kept for existing callers.
    pub async fn query(&self, raw: &str) -> ModelResult<QueryResult> {
        self.deprecated("query", None);
        let connection = self.resolved.require_connection()?;
        execute(connection.as_ref(), raw).await
    }

    fn deprecated(&self, operation: &'static str, replacement: Option<&'static str>) {
        self.resolved.diagnostics.emit(&Diagnostic::Deprecated {
            operation,
            replacement,
        });
    }
}
