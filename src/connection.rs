use anyhow::anyhow;
use log::info;

use crate::db::{sqlite_target, DBBehavior, DatabaseType, Postgres, Sqlite, DB};
use crate::error::{ProvisionError, Result};

/// Open a connection for `connection_string` and verify it with a ping.
///
/// The returned handle is closed when dropped.
pub fn open(connection_string: &str) -> Result<DB> {
    let connection_string = connection_string.trim();
    let mut db = match DatabaseType::detect(connection_string) {
        DatabaseType::Postgres => Postgres::connect(connection_string).map(DB::Postgres),
        DatabaseType::Sqlite => match sqlite_target(connection_string) {
            Some(target) if !target.is_empty() => Sqlite::open(target).map(DB::Sqlite),
            _ => Err(anyhow!("sqlite connection string has no database path")),
        },
    }
    .map_err(ProvisionError::Connection)?;

    db.ping().map_err(ProvisionError::Connection)?;
    info!("connected ({:?})", db.database_type());
    Ok(db)
}
