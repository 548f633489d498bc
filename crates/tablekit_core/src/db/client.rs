//! Connection handle and table/row convenience operations.
//!
//! # Responsibility
//! - Own exactly one driver connection for its whole lifetime.
//! - Turn table descriptors and row requests into single round trips.
//!
//! # Invariants
//! - Table names are checked against the identifier allowlist first.
//! - Values and condition arguments are always bound, never interpolated.
//! - A live `Rows` cursor mutably borrows the handle, so no other statement
//!   can run on the connection until the cursor is dropped.

use super::open::{close_client, open_client};
use super::{DbError, DbResult};
use crate::config::ConnectOptions;
use crate::model::table::{validate_identifier, IdentifierKind, TableDescriptor};
use crate::sql;
use log::{debug, error};
use postgres::fallible_iterator::FallibleIterator;
use postgres::types::ToSql;
use postgres::{Client, Row, RowIter};
use std::time::Instant;

/// One open PostgreSQL connection.
///
/// Dropping the handle releases the connection; `close` does the same but
/// reports whether the server acknowledged the shutdown.
pub struct Database {
    client: Client,
}

impl Database {
    /// Opens a connection from a keyword (`host=... dbname=...`) or URL
    /// (`postgres://...`) connection string.
    ///
    /// # Errors
    /// - `DbError::Connect` when the string cannot be parsed or the server
    ///   cannot be reached.
    pub fn open(connection_string: &str) -> DbResult<Self> {
        let client = open_client(connection_string)?;
        Ok(Self { client })
    }

    pub fn open_with(options: &ConnectOptions) -> DbResult<Self> {
        Self::open(&options.to_connection_string())
    }

    /// Closes the connection, consuming the handle.
    pub fn close(self) -> DbResult<()> {
        close_client(self.client)
    }

    /// Returns whether the underlying connection has been lost.
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    /// Direct access to the driver for statements these helpers do not cover.
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Creates `table` unless a table with that name already exists.
    ///
    /// # Errors
    /// - `DbError::InvalidTable` when the descriptor fails validation.
    /// - `DbError::Statement` when the server rejects the DDL.
    pub fn create_table(&mut self, table: &TableDescriptor) -> DbResult<()> {
        table.validate()?;
        let sql = sql::create_table_sql(table);
        self.execute("create_table", &table.name, &sql, &[])?;
        Ok(())
    }

    /// Drops `name` if it exists; a missing table is not an error.
    pub fn drop_table(&mut self, name: &str) -> DbResult<()> {
        check_table_name(name)?;
        let sql = sql::drop_table_sql(name);
        self.execute("drop_table", name, &sql, &[])?;
        Ok(())
    }

    /// Inserts one row with `values` bound to `$1..$n` in column order.
    ///
    /// Returns the number of rows inserted.
    pub fn insert_row(&mut self, table: &str, values: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        check_table_name(table)?;
        let sql = sql::insert_sql(table, values.len());
        self.execute("insert_row", table, &sql, values)
    }

    /// Runs `SELECT * FROM table WHERE condition` and returns a lazy cursor.
    ///
    /// `condition` is trusted SQL that refers to `args` as `$1..$n`.
    ///
    /// # Errors
    /// - `DbError::EmptyCondition` for a blank condition.
    /// - `DbError::Statement` when the server rejects the query.
    pub fn select_rows(
        &mut self,
        table: &str,
        condition: &str,
        args: &[&(dyn ToSql + Sync)],
    ) -> DbResult<Rows<'_>> {
        check_table_name(table)?;
        check_condition(condition)?;
        let sql = sql::select_sql(table, condition);

        let started_at = Instant::now();
        let params = args.iter().map(|arg| *arg as &dyn ToSql);
        match self.client.query_raw(sql.as_str(), params) {
            Ok(inner) => {
                debug!(
                    "event=select_rows module=db status=ok table={} params={} duration_ms={}",
                    table,
                    args.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Rows { inner, done: false })
            }
            Err(err) => {
                log_statement_error("select_rows", table, started_at, &err);
                Err(DbError::Statement(err))
            }
        }
    }

    /// Runs `DELETE FROM table WHERE condition` and returns the affected count.
    pub fn delete_rows(
        &mut self,
        table: &str,
        condition: &str,
        args: &[&(dyn ToSql + Sync)],
    ) -> DbResult<u64> {
        check_table_name(table)?;
        check_condition(condition)?;
        let sql = sql::delete_sql(table, condition);
        self.execute("delete_rows", table, &sql, args)
    }

    /// Returns whether `name` exists in the current schema.
    pub fn table_exists(&mut self, name: &str) -> DbResult<bool> {
        check_table_name(name)?;
        // Unquoted names are stored lower-cased.
        let folded = name.to_ascii_lowercase();
        let row = self
            .client
            .query_one(sql::TABLE_EXISTS_SQL, &[&folded])
            .map_err(DbError::Statement)?;
        row.try_get::<_, bool>(0).map_err(DbError::Consume)
    }

    fn execute(
        &mut self,
        event: &'static str,
        table: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DbResult<u64> {
        let started_at = Instant::now();
        match self.client.execute(sql, params) {
            Ok(rows) => {
                debug!(
                    "event={} module=db status=ok table={} params={} rows={} duration_ms={}",
                    event,
                    table,
                    params.len(),
                    rows,
                    started_at.elapsed().as_millis()
                );
                Ok(rows)
            }
            Err(err) => {
                log_statement_error(event, table, started_at, &err);
                Err(DbError::Statement(err))
            }
        }
    }
}

/// Consume-once cursor over the rows of a `select_rows` call.
///
/// Rows are pulled from the connection as the iterator advances. The cursor
/// is fused: after the last row or the first error it yields `None`.
pub struct Rows<'a> {
    inner: RowIter<'a>,
    done: bool,
}

impl Rows<'_> {
    /// Number of rows the server reported once the cursor is exhausted.
    pub fn rows_affected(&self) -> Option<u64> {
        self.inner.rows_affected()
    }
}

impl Iterator for Rows<'_> {
    type Item = DbResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match FallibleIterator::next(&mut self.inner) {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                error!(
                    "event=select_rows module=db status=error error_code=row_read_failed error={}",
                    err
                );
                Some(Err(DbError::Consume(err)))
            }
        }
    }
}

fn check_table_name(name: &str) -> DbResult<()> {
    validate_identifier(IdentifierKind::Table, name).map_err(|_| DbError::InvalidIdentifier {
        value: name.to_string(),
    })
}

fn check_condition(condition: &str) -> DbResult<()> {
    if condition.trim().is_empty() {
        return Err(DbError::EmptyCondition);
    }
    Ok(())
}

fn log_statement_error(event: &str, table: &str, started_at: Instant, err: &postgres::Error) {
    error!(
        "event={} module=db status=error table={} duration_ms={} error_code=statement_failed sqlstate={} error={}",
        event,
        table,
        started_at.elapsed().as_millis(),
        err.code().map_or("-", |state| state.code()),
        err
    );
}
