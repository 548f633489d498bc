//! Statement text builders.
//!
//! # Responsibility
//! - Render DDL/DML text for every `Database` operation.
//! - Generate positional placeholders sized to a bound value count.
//!
//! # Invariants
//! - Builders are pure; callers validate identifiers before rendering.
//! - Values are never rendered into SQL text, only `$n` markers.

use crate::model::table::TableDescriptor;

/// Returns `$1, $2, ..., $count`; empty when `count == 0`.
pub fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("${index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_table_sql(table: &TableDescriptor) -> String {
    let columns = table
        .columns
        .iter()
        .map(|column| format!("{} {}", column.name, column.column_type.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({columns})", table.name)
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

/// Zero values insert a row made entirely of column defaults.
pub fn insert_sql(table: &str, value_count: usize) -> String {
    if value_count == 0 {
        return format!("INSERT INTO {table} DEFAULT VALUES");
    }
    format!("INSERT INTO {table} VALUES ({})", placeholders(value_count))
}

pub fn select_sql(table: &str, condition: &str) -> String {
    format!("SELECT * FROM {table} WHERE {}", condition.trim())
}

pub fn delete_sql(table: &str, condition: &str) -> String {
    format!("DELETE FROM {table} WHERE {}", condition.trim())
}

pub const TABLE_EXISTS_SQL: &str = "SELECT EXISTS(
    SELECT 1
    FROM information_schema.tables
    WHERE table_schema = current_schema() AND table_name::text = $1
)";
