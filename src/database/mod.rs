pub mod sqlx;

use std::str::FromStr;

use ::sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::error::Error;

/// Builds the process-wide connection pool. Compatibility shim: some
/// Postgres-wire-compatible engines report a server version sqlx rejects;
/// `PG_SERVER_VERSION` forces one at the driver boundary instead of patching
/// connection code elsewhere.
pub async fn connect(url: &str) -> Result<PgPool, Error> {
    let mut options = PgConnectOptions::from_str(url)?;
    if let Ok(version) = dotenv::var("PG_SERVER_VERSION") {
        log::warn!("forcing reported server version to {}", version);
        options = options.options([("server_version", version.as_str())]);
    }
    let pool = PgPoolOptions::new().max_connections(5).connect_with(options).await?;
    Ok(pool)
}
