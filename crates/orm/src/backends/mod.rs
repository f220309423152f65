//! Driver Backends
//!
//! The driver contract consumed by models and collections, and the sqlx based
//! MySQL implementation of it.

pub mod core;
pub mod mysql;

pub use self::core::*;
pub use mysql::MySqlDriver;
