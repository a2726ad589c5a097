use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode};

use muellbot_models::reminder::Reminder;
use muellbot_scheduler::delivery::ReminderDeliveryChannel;

use crate::messages;

pub struct TelegramDeliveryChannel {
    bot: Bot,
}

impl TelegramDeliveryChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReminderDeliveryChannel for TelegramDeliveryChannel {
    async fn send_reminder_notification(
        &self,
        reminder: &Reminder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.bot
            .send_message(
                ChatId(reminder.key.recipient_id),
                messages::notification(reminder),
            )
            .parse_mode(ParseMode::MarkdownV2)
            .await?;

        Ok(())
    }
}
