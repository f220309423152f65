//! CRUD Operations - fetch, save, destroy and raw queries for one row
//!
//! Each operation builds one statement from the current attributes and the
//! effective id, runs it through the configured driver and updates the
//! attributes from the result. Failures leave the attributes untouched.

use serde_json::Value;

use super::{MysqlModel, PrimaryKey};
use crate::backends::{execute, QueryResult, Row};
use crate::diagnostics::Diagnostic;
use crate::error::{ModelError, ModelResult};
use crate::sql;

impl MysqlModel {
    /// Load one row by key and replace the attributes with it.
    ///
    /// The id is interpolated as-is, without escaping.
    pub async fn fetch(&mut self, id: Option<PrimaryKey>, fields: Option<&str>) -> ModelResult<Row> {
        let id = self.effective_id(id).ok_or(ModelError::NoId)?;
        let connection = self.config.require_connection()?;
        let fields = fields.filter(|f| !f.is_empty()).unwrap_or("*");

        let statement = sql::select_by_id(
            fields,
            &self.config.table_name,
            &self.config.primary_key,
            &id.to_string(),
        );
        let result = execute(connection.as_ref(), &statement).await?;

        let row = result
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::NotFound(self.config.table_name.clone()))?;

        self.replace_attributes(row.clone()).await?;
        Ok(row)
    }

    /// Deprecated alias of [`MysqlModel::fetch`]
    pub async fn read(&mut self, id: Option<PrimaryKey>, fields: Option<&str>) -> ModelResult<Row> {
        self.deprecated("read", Some("fetch"));
        self.fetch(id, fields).await
    }

    /// Insert the attributes as a new row, or update the row addressed by the
    /// effective id.
    ///
    /// On insert the primary key attribute is set to the generated id.
    pub async fn save(&mut self, id: Option<PrimaryKey>) -> ModelResult<QueryResult> {
        let connection = self.config.require_connection()?;
        let assignments = connection.escape(&Value::Object(self.attributes.clone()));

        match self.effective_id(id) {
            None => {
                let statement = sql::insert_set(&self.config.table_name, &assignments);
                let result = execute(connection.as_ref(), &statement).await?;
                if result.insert_id == 0 {
                    return Err(ModelError::NoRowInserted);
                }

                let primary_key = self.config.primary_key.clone();
                self.set(&primary_key, Value::from(result.insert_id)).await?;
                Ok(result)
            }
            Some(id) => {
                let statement = sql::update_by_id(
                    &self.config.table_name,
                    &assignments,
                    &self.config.primary_key,
                    &connection.escape(&id.to_json()),
                );
                let result = execute(connection.as_ref(), &statement).await?;
                if result.changed_rows == 0 {
                    return Err(ModelError::NoRowsChanged);
                }
                Ok(result)
            }
        }
    }

    /// Delete the row addressed by the effective id and clear the attributes
    pub async fn destroy(&mut self, id: Option<PrimaryKey>) -> ModelResult<QueryResult> {
        let id = self.effective_id(id).ok_or(ModelError::NoId)?;
        let connection = self.config.require_connection()?;

        let statement = sql::delete_by_id(
            &self.config.table_name,
            &self.config.primary_key,
            &connection.escape(&id.to_json()),
        );
        let result = execute(connection.as_ref(), &statement).await?;
        if result.affected_rows == 0 {
            return Err(ModelError::NoRowsRemoved);
        }

        self.clear().await?;
        Ok(result)
    }

    /// Deprecated alias of [`MysqlModel::destroy`]
    pub async fn remove(&mut self, id: Option<PrimaryKey>) -> ModelResult<QueryResult> {
        self.deprecated("remove", Some("destroy"));
        self.destroy(id).await
    }

    /// Run an arbitrary statement. Deprecated; kept for existing callers.
    pub async fn query(&self, raw: &str) -> ModelResult<QueryResult> {
        self.deprecated("query", None);
        let connection = self.config.require_connection()?;
        execute(connection.as_ref(), raw).await
    }

    fn deprecated(&self, operation: &'static str, replacement: Option<&'static str>) {
        self.config.diagnostics.emit(&Diagnostic::Deprecated {
            operation,
            replacement,
        });
    }
}
