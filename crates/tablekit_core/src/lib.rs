//! Thin PostgreSQL helper for creating tables and moving rows.
//! Every operation is one synchronous round trip through the `postgres` driver.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod sql;

pub use config::{ConnectOptions, SslMode};
pub use db::{Database, DbError, DbResult, Rows};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::table::{
    validate_identifier, ColumnDescriptor, IdentifierKind, TableDescriptor, TableValidationError,
};
pub use postgres::types::ToSql;
pub use postgres::Row;
pub use sql::placeholders;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
