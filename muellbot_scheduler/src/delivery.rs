use std::error::Error;

use async_trait::async_trait;

use muellbot_models::reminder::Reminder;

/// Outbound side of the system: hands a fired reminder to whatever medium
/// notifies the recipient.
#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn send_reminder_notification(
        &self,
        reminder: &Reminder,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
