//! Schema description types used to generate DDL.
//!
//! # Responsibility
//! - Hold caller-supplied table shapes as plain, serializable data.
//! - Own the identifier allowlist shared by every SQL builder.
//!
//! # Invariants
//! - Nothing in this module touches the database.

pub mod table;
