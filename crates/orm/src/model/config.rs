//! Model and collection configuration
//!
//! A model type declares its table, primary key, driver handle and
//! diagnostics sink in a `ModelConfig`. A collection carries optional
//! overrides in a `CollectionConfig`; `resolve` merges the two with the
//! collection's values taking precedence.

use std::fmt;

use crate::backends::ConnectionRef;
use crate::diagnostics::{self, DiagnosticsRef};
use crate::error::{ModelError, ModelResult};

/// Primary key name used when none is configured
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// How the bulk upsert renders attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertEscaping {
    /// Raw text in single quotes, no escaping (the established statement text)
    #[default]
    Legacy,
    /// Values escaped through the driver like every other write
    Escaped,
}

/// Table mapping declared by a model type
#[derive(Clone)]
pub struct ModelConfig {
    pub table_name: String,
    pub primary_key: String,
    pub connection: Option<ConnectionRef>,
    pub diagnostics: DiagnosticsRef,
}

impl ModelConfig {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            connection: None,
            diagnostics: diagnostics::default_sink(),
        }
    }

    pub fn primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.to_string();
        self
    }

    pub fn connection(mut self, connection: ConnectionRef) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsRef) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Driver handle, or `NoConnection`
    pub fn require_connection(&self) -> ModelResult<ConnectionRef> {
        self.connection.clone().ok_or(ModelError::NoConnection)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("connection", &self.connection.is_some())
            .finish()
    }
}

/// Collection level overrides of the paired model's configuration
#[derive(Clone, Default)]
pub struct CollectionConfig {
    pub table_name: Option<String>,
    pub primary_key: Option<String>,
    pub connection: Option<ConnectionRef>,
    pub diagnostics: Option<DiagnosticsRef>,
    pub upsert_escaping: UpsertEscaping,
}

impl CollectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = Some(primary_key.to_string());
        self
    }

    pub fn connection(mut self, connection: ConnectionRef) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsRef) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn upsert_escaping(mut self, escaping: UpsertEscaping) -> Self {
        self.upsert_escaping = escaping;
        self
    }

    /// Resolve the effective configuration: collection override, then the
    /// model's declared value, then `id` for the primary key.
    pub fn resolve(&self, model: &ModelConfig) -> ModelConfig {
        let primary_key = non_empty(&self.primary_key)
            .or_else(|| Some(model.primary_key.as_str()).filter(|pk| !pk.is_empty()))
            .unwrap_or(DEFAULT_PRIMARY_KEY)
            .to_string();

        ModelConfig {
            table_name: non_empty(&self.table_name)
                .unwrap_or(&model.table_name)
                .to_string(),
            primary_key,
            connection: self.connection.clone().or_else(|| model.connection.clone()),
            diagnostics: self
                .diagnostics
                .clone()
                .unwrap_or_else(|| model.diagnostics.clone()),
        }
    }
}

impl fmt::Debug for CollectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("connection", &self.connection.is_some())
            .field("upsert_escaping", &self.upsert_escaping)
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
