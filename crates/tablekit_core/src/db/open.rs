//! Connection bootstrap and shutdown for PostgreSQL.
//!
//! # Responsibility
//! - Parse connection strings with the driver's own parser.
//! - Establish and terminate driver connections.
//! - Emit `db_open`/`db_close` events with duration and status.
//!
//! # Invariants
//! - Log lines carry the database name only, never credentials.
//! - Every failure path logs exactly one `status=error` line.

use super::{DbError, DbResult};
use log::{error, info};
use postgres::{Client, Config, NoTls};
use std::time::Instant;

/// Parses `connection_string` and opens a plain-TCP connection.
///
/// # Side effects
/// - Performs a network round trip for the startup handshake.
/// - Emits `db_open` logging events with duration and status.
pub(crate) fn open_client(connection_string: &str) -> DbResult<Client> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start");

    let config = match connection_string.parse::<Config>() {
        Ok(config) => config,
        Err(err) => {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_config_invalid error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::Connect(err));
        }
    };
    let dbname = config.get_dbname().unwrap_or("-").to_string();

    match config.connect(NoTls) {
        Ok(client) => {
            info!(
                "event=db_open module=db status=ok dbname={} duration_ms={}",
                dbname,
                started_at.elapsed().as_millis()
            );
            Ok(client)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error dbname={} duration_ms={} error_code=db_connect_failed error={}",
                dbname,
                started_at.elapsed().as_millis(),
                err
            );
            Err(DbError::Connect(err))
        }
    }
}

/// Sends the termination message and waits for the server to close.
pub(crate) fn close_client(client: Client) -> DbResult<()> {
    let started_at = Instant::now();

    match client.close() {
        Ok(()) => {
            info!(
                "event=db_close module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_close module=db status=error duration_ms={} error_code=db_close_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(DbError::Connect(err))
        }
    }
}
