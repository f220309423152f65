//! # mysql-model: Active-Record models and collections for MySQL
//!
//! A `MysqlModel` is one row held in memory as a JSON attribute map; a
//! `MysqlCollection` is an ordered set of such rows. Both issue plain SQL
//! text through a `Connection` handle and keep their in-memory state in
//! line with what the statements did.
//!
//! The `MySqlDriver` backend runs statements on a sqlx pool. Tests and
//! downstream code can use `fake::FakeConnection` to script results and
//! assert on the emitted SQL.

pub mod backends;
pub mod collection;
pub mod conditions;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod fake;
pub mod model;
pub mod observers;
pub mod security;
pub mod sql;

// Re-export core types
pub use backends::{Connection, ConnectionRef, MySqlDriver, QueryResult, Row};
pub use collection::{DestroyTarget, MysqlCollection};
pub use conditions::{parse_conditions, Conditions, ParsedConditions};
pub use config::{ConfigError, DriverConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, DiagnosticsRef, TracingSink};
pub use error::*;
pub use events::{CollectionObserver, ModelObserver};
pub use model::{
    Attributes, CollectionConfig, ModelConfig, MysqlModel, PrimaryKey, UpsertEscaping,
};
