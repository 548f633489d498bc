//! PostgreSQL connection handle and its error surface.
//!
//! # Responsibility
//! - Open and close driver connections with structured log events.
//! - Expose table/row convenience operations over one connection.
//!
//! # Invariants
//! - Driver errors are carried unchanged and exposed through `source()`.
//! - Identifiers are validated before any statement text is built.

use crate::model::table::TableValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod client;
mod open;

pub use client::{Database, Rows};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Connection string parsing, connection setup or shutdown failed.
    Connect(postgres::Error),
    /// The server rejected or failed a statement.
    Statement(postgres::Error),
    /// Reading rows from an open cursor failed.
    Consume(postgres::Error),
    InvalidTable(TableValidationError),
    InvalidIdentifier { value: String },
    EmptyCondition,
}

impl DbError {
    /// Returns the server SQLSTATE code when the server reported one.
    pub fn db_code(&self) -> Option<&str> {
        self.driver_error()
            .and_then(postgres::Error::code)
            .map(|state| state.code())
    }

    fn driver_error(&self) -> Option<&postgres::Error> {
        match self {
            Self::Connect(err) | Self::Statement(err) | Self::Consume(err) => Some(err),
            Self::InvalidTable(_) | Self::InvalidIdentifier { .. } | Self::EmptyCondition => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(err) => write!(f, "connection failed: {err}"),
            Self::Statement(err) => write!(f, "statement failed: {err}"),
            Self::Consume(err) => write!(f, "reading rows failed: {err}"),
            Self::InvalidTable(err) => write!(f, "{err}"),
            Self::InvalidIdentifier { value } => write!(f, "invalid table identifier `{value}`"),
            Self::EmptyCondition => write!(f, "condition cannot be empty"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect(err) | Self::Statement(err) | Self::Consume(err) => Some(err),
            Self::InvalidTable(err) => Some(err),
            Self::InvalidIdentifier { .. } | Self::EmptyCondition => None,
        }
    }
}

impl From<TableValidationError> for DbError {
    fn from(value: TableValidationError) -> Self {
        Self::InvalidTable(value)
    }
}
