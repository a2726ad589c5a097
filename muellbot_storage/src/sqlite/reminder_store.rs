mod model;

use async_trait::async_trait;
use model::ReminderRow;
use sqlx::SqlitePool;

use muellbot_models::reminder::{RecipientId, Reminder, ReminderKey};

use crate::{ReminderStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reminders (
    recipient_id INTEGER NOT NULL,
    due_date     TEXT NOT NULL,
    kind         TEXT NOT NULL,
    fire_at      TEXT NOT NULL,
    state        TEXT NOT NULL,
    PRIMARY KEY (recipient_id, due_date, kind)
)";

pub struct SqliteReminderStore {
    pool: SqlitePool,
}

impl SqliteReminderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the schema. Must succeed before the store is handed out.
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ReminderStore for SqliteReminderStore {
    async fn get(&self, key: &ReminderKey) -> Result<Option<Reminder>, StoreError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            "SELECT recipient_id, due_date, kind, fire_at, state
             FROM reminders
             WHERE recipient_id = ? AND due_date = ? AND kind = ?",
        )
        .bind(key.recipient_id)
        .bind(key.due_date)
        .bind(key.kind.token())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Reminder::try_from).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            "SELECT recipient_id, due_date, kind, fire_at, state FROM reminders",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn get_for_recipient(
        &self,
        recipient_id: RecipientId,
    ) -> Result<Vec<Reminder>, StoreError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            "SELECT recipient_id, due_date, kind, fire_at, state
             FROM reminders
             WHERE recipient_id = ?",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn put(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let row = ReminderRow::from(reminder);

        sqlx::query(
            "INSERT INTO reminders (recipient_id, due_date, kind, fire_at, state)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (recipient_id, due_date, kind)
             DO UPDATE SET fire_at = excluded.fire_at, state = excluded.state",
        )
        .bind(row.recipient_id)
        .bind(row.due_date)
        .bind(row.kind)
        .bind(row.fire_at)
        .bind(row.state)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &ReminderKey) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM reminders WHERE recipient_id = ? AND due_date = ? AND kind = ?",
        )
        .bind(key.recipient_id)
        .bind(key.due_date)
        .bind(key.kind.token())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
