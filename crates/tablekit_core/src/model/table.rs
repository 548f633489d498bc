//! Table and column descriptors.
//!
//! # Responsibility
//! - Describe a table shape as plain data for DDL generation.
//! - Validate identifiers and column types before they reach SQL text.
//!
//! # Invariants
//! - Identifiers match `^[A-Za-z_][A-Za-z0-9_]{0,62}$`.
//! - Column types never carry statement separators or comment markers.
//! - A valid descriptor has at least one column and no duplicate column names.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid identifier regex"));

const FORBIDDEN_TYPE_FRAGMENTS: &[&str] = &[";", "--", "/*", "*/"];

/// Which part of a descriptor an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Table,
    Column,
}

impl Display for IdentifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// Validation failures for table descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableValidationError {
    InvalidIdentifier { kind: IdentifierKind, value: String },
    NoColumns { table: String },
    DuplicateColumn { column: String },
    InvalidColumnType { column: String, column_type: String },
}

impl Display for TableValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { kind, value } => {
                write!(f, "invalid {kind} identifier `{value}`")
            }
            Self::NoColumns { table } => write!(f, "table `{table}` has no columns"),
            Self::DuplicateColumn { column } => write!(f, "duplicate column `{column}`"),
            Self::InvalidColumnType {
                column,
                column_type,
            } => write!(f, "invalid type `{column_type}` for column `{column}`"),
        }
    }
}

impl Error for TableValidationError {}

/// One column: a name and a raw SQL type string such as `TEXT NOT NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Serialized as `type` to read naturally in JSON schema files.
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// A table name with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Creates a descriptor without columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column, keeping declaration order.
    pub fn column(mut self, name: impl Into<String>, column_type: impl Into<String>) -> Self {
        self.columns.push(ColumnDescriptor::new(name, column_type));
        self
    }

    /// Checks every invariant required before the descriptor is rendered as DDL.
    ///
    /// # Errors
    /// - `InvalidIdentifier` when the table or a column name fails the allowlist.
    /// - `NoColumns` when the descriptor is empty.
    /// - `DuplicateColumn` when two columns fold to the same lower-case name.
    /// - `InvalidColumnType` when a type is blank or carries `;`, `--`, `/*`.
    pub fn validate(&self) -> Result<(), TableValidationError> {
        validate_identifier(IdentifierKind::Table, &self.name)?;

        if self.columns.is_empty() {
            return Err(TableValidationError::NoColumns {
                table: self.name.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            validate_identifier(IdentifierKind::Column, &column.name)?;
            // Unquoted identifiers fold to lower case on the server.
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(TableValidationError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
            validate_column_type(column)?;
        }

        Ok(())
    }
}

/// Checks a single identifier against the allowlist.
pub fn validate_identifier(kind: IdentifierKind, value: &str) -> Result<(), TableValidationError> {
    if IDENTIFIER_RE.is_match(value) {
        return Ok(());
    }
    Err(TableValidationError::InvalidIdentifier {
        kind,
        value: value.to_string(),
    })
}

fn validate_column_type(column: &ColumnDescriptor) -> Result<(), TableValidationError> {
    let column_type = column.column_type.trim();
    let rejected = column_type.is_empty()
        || FORBIDDEN_TYPE_FRAGMENTS
            .iter()
            .any(|fragment| column_type.contains(fragment));
    if rejected {
        return Err(TableValidationError::InvalidColumnType {
            column: column.name.clone(),
            column_type: column.column_type.clone(),
        });
    }
    Ok(())
}
