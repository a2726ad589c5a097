mod appsettings;

use std::sync::Arc;

use anyhow::Context;
use teloxide::Bot;

use appsettings::AppSettings;
use muellbot_scheduler::TimerScheduler;
use muellbot_service::{DeliveryFireWorker, ReminderService};
use muellbot_storage::sqlite::{self, SqliteReminderStore};
use muellbot_telegram::{TelegramDeliveryChannel, TelegramInteractionInterface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::new().context("Reading configuration")?;

    let pool = sqlite::open_pool(&settings.storage.path)
        .await
        .context("Opening the reminder store")?;
    let store = Arc::new(SqliteReminderStore::new(pool));
    store.init().await.context("Preparing the reminder store")?;

    let bot = Bot::new(settings.telegram.token.clone());

    let delivery_channel = Arc::new(TelegramDeliveryChannel::new(bot.clone()));
    let fire_worker = Arc::new(DeliveryFireWorker::new(store.clone(), delivery_channel));
    let scheduler = Arc::new(TimerScheduler::new(fire_worker));
    let service = Arc::new(ReminderService::new(store.clone(), scheduler));

    service
        .restore()
        .await
        .context("Re-arming stored reminders")?;

    TelegramInteractionInterface::start(bot, service).await;

    store.close().await;
    Ok(())
}
