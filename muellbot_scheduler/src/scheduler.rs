use async_trait::async_trait;

use muellbot_models::reminder::{Reminder, ReminderKey};

pub struct ScheduleRequest {
    pub reminder: Reminder,
}

impl ScheduleRequest {
    pub fn new(reminder: Reminder) -> Self {
        Self { reminder }
    }
}

/// Fires a registered reminder no earlier than its target instant, at most
/// once, with support for pre-fire cancellation.
#[async_trait]
pub trait ReminderScheduler: Send + Sync + 'static {
    /// Arms a timer for the reminder. An armed timer under the same key is
    /// atomically replaced: the old entry is cancelled, the new one armed.
    async fn schedule_reminder(&self, request: ScheduleRequest) -> anyhow::Result<()>;

    /// Returns whether an armed timer was found and cancelled. A key that
    /// already fired, was already cancelled or was never scheduled reports
    /// false.
    async fn cancel_reminder(&self, key: &ReminderKey) -> anyhow::Result<bool>;
}

/// Invoked by the scheduler at most once per armed entry, after the entry
/// has transitioned out of its armed state.
#[async_trait]
pub trait ReminderFiredHandler: Send + Sync + 'static {
    async fn reminder_fired(&self, reminder: Reminder);
}
