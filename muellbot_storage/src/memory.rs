use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use muellbot_models::reminder::{RecipientId, Reminder, ReminderKey};

use crate::{ReminderStore, StoreError};

/// Non-durable store over a hash map. Used by tests and local experiments;
/// anything that should survive a restart goes through the sqlite store.
#[derive(Default)]
pub struct InMemoryReminderStore {
    reminders: RwLock<HashMap<ReminderKey, Reminder>>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn get(&self, key: &ReminderKey) -> Result<Option<Reminder>, StoreError> {
        Ok(self.reminders.read().await.get(key).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        Ok(self.reminders.read().await.values().cloned().collect())
    }

    async fn get_for_recipient(
        &self,
        recipient_id: RecipientId,
    ) -> Result<Vec<Reminder>, StoreError> {
        Ok(self
            .reminders
            .read()
            .await
            .values()
            .filter(|reminder| reminder.key.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn put(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.reminders
            .write()
            .await
            .insert(reminder.key.clone(), reminder.clone());
        Ok(())
    }

    async fn delete(&self, key: &ReminderKey) -> Result<bool, StoreError> {
        Ok(self.reminders.write().await.remove(key).is_some())
    }
}
