use async_trait::async_trait;
use thiserror::Error;

use muellbot_models::reminder::{RecipientId, Reminder, ReminderKey};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    #[error("stored reminder is malformed: {0}")]
    Corrupt(String),
}

/// Durable mapping of reminder key to pending reminder. Once `put` returns,
/// the record survives a crash. Fired and cancelled reminders are deleted
/// rather than retained, so the store only ever holds the pending set.
#[async_trait]
pub trait ReminderStore: Send + Sync + 'static {
    async fn get(&self, key: &ReminderKey) -> Result<Option<Reminder>, StoreError>;

    /// Every stored record, in no particular order. Callers needing display
    /// order sort explicitly.
    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError>;

    async fn get_for_recipient(
        &self,
        recipient_id: RecipientId,
    ) -> Result<Vec<Reminder>, StoreError>;

    /// Insert or overwrite by key.
    async fn put(&self, reminder: &Reminder) -> Result<(), StoreError>;

    /// Returns whether a record was actually removed. False is not an error.
    async fn delete(&self, key: &ReminderKey) -> Result<bool, StoreError>;
}
