use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use muellbot_models::reminder::Reminder;
use muellbot_scheduler::ReminderFiredHandler;
use muellbot_scheduler::delivery::ReminderDeliveryChannel;
use muellbot_storage::ReminderStore;

pub(crate) const DELIVERY_ATTEMPTS: u32 = 3;
pub(crate) const DELIVERY_RETRY_DELAY: Duration = Duration::from_secs(30);

/// The fire path. Invoked by the scheduler once per fired reminder, after
/// the timer entry has been claimed, so delivery happens without holding
/// any lock; the store row is removed afterwards.
pub struct DeliveryFireWorker {
    store: Arc<dyn ReminderStore>,
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
}

impl DeliveryFireWorker {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        delivery_channel: Arc<dyn ReminderDeliveryChannel>,
    ) -> Self {
        Self {
            store,
            delivery_channel,
        }
    }

    /// Bounded retry with a doubling backoff. Exhausting the attempts drops
    /// the reminder, loudly.
    async fn deliver(&self, reminder: &Reminder) -> bool {
        let mut backoff = DELIVERY_RETRY_DELAY;

        for attempt in 1..=DELIVERY_ATTEMPTS {
            match self
                .delivery_channel
                .send_reminder_notification(reminder)
                .await
            {
                Ok(()) => return true,
                Err(error) => {
                    log::warn!(
                        "Reminder delivery failed [key = {}, attempt = {}/{}, error = {}]",
                        reminder.key,
                        attempt,
                        DELIVERY_ATTEMPTS,
                        error
                    );
                }
            }

            if attempt < DELIVERY_ATTEMPTS {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        false
    }
}

#[async_trait]
impl ReminderFiredHandler for DeliveryFireWorker {
    async fn reminder_fired(&self, reminder: Reminder) {
        if !self.deliver(&reminder).await {
            log::error!("Giving up on reminder delivery [key = {}]", reminder.key);
        }

        // Fired is a terminal state; its durable representation is the
        // absence of the row.
        if let Err(error) = self.store.delete(&reminder.key).await {
            log::error!(
                "Failed to remove fired reminder from the store [key = {}, error = {}]",
                reminder.key,
                error
            );
        }
    }
}
