mod reminder_store;

pub use reminder_store::SqliteReminderStore;
pub use sqlx;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::StoreError;

/// Opens (creating if missing) the database file backing the store. An
/// existing but unreadable file is a fatal startup error; the process must
/// not run with silently lost state.
pub async fn open_pool(path: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    Ok(SqlitePool::connect_with(options).await?)
}
