//! Connection options.
//!
//! # Responsibility
//! - Describe a PostgreSQL target as typed, serializable fields.
//! - Render those fields into the driver's keyword connection string.
//!
//! # Invariants
//! - Rendered values are quoted per libpq keyword rules when needed.
//! - `Debug` output never contains the password.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// TLS negotiation mode passed through to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslMode {
    #[default]
    Disable,
    Prefer,
    Require,
}

impl SslMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Prefer => "prefer",
            Self::Require => "require",
        }
    }
}

impl Display for SslMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed PostgreSQL connection target.
///
/// Missing fields fall back to [`ConnectOptions::default`] when deserialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,
    pub sslmode: SslMode,
    pub application_name: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: None,
            sslmode: SslMode::Disable,
            application_name: None,
        }
    }
}

impl ConnectOptions {
    /// Renders `host=... port=... dbname=... user=... [password=...] sslmode=...`.
    pub fn to_connection_string(&self) -> String {
        let port = self.port.to_string();
        let mut pairs: Vec<(&str, &str)> = vec![
            ("host", self.host.as_str()),
            ("port", port.as_str()),
            ("dbname", self.dbname.as_str()),
            ("user", self.user.as_str()),
        ];
        if let Some(password) = self.password.as_deref() {
            pairs.push(("password", password));
        }
        pairs.push(("sslmode", self.sslmode.as_str()));
        if let Some(name) = self.application_name.as_deref() {
            pairs.push(("application_name", name));
        }

        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", quote_value(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Debug for ConnectOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("sslmode", &self.sslmode)
            .field("application_name", &self.application_name)
            .finish()
    }
}

fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '\'' || ch == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
