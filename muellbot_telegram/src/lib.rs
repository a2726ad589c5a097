mod delivery_channel;
mod messages;

pub use delivery_channel::TelegramDeliveryChannel;
pub use teloxide;

use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler,
    dptree::{self, case},
    macros::BotCommands,
    prelude::*,
    types::ParseMode,
};

use muellbot_service::{ReminderError, ReminderService};

type HandlerResult = anyhow::Result<()>;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    parse_with = "split",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "add a trash date: /add dd.mm.yyyy bio/rest/papier/plastik")]
    Add(String, String),
    #[command(description = "remove a trash date: /remove dd.mm.yyyy bio/rest/papier/plastik")]
    Remove(String, String),
    #[command(description = "show all noted dates")]
    List,
    #[command(description = "show usage")]
    Help,
}

pub struct TelegramInteractionInterface;

impl TelegramInteractionInterface {
    pub async fn start(bot: Bot, service: Arc<ReminderService>) {
        log::info!("Starting Telegram interaction interface");

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![service])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

fn schema() -> UpdateHandler<anyhow::Error> {
    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Add(date, kind)].endpoint(add))
        .branch(case![Command::Remove(date, kind)].endpoint(remove))
        .branch(case![Command::List].endpoint(list))
        .branch(case![Command::Help].endpoint(help));

    Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(unrecognized))
}

async fn add(
    bot: Bot,
    msg: Message,
    service: Arc<ReminderService>,
    (date, kind): (String, String),
) -> HandlerResult {
    let reply = match service.add(msg.chat.id.0, &date, &kind).await {
        Ok(reminder) => messages::added(&reminder),
        Err(error) => reply_for_error(error, "/add", msg.chat.id),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn remove(
    bot: Bot,
    msg: Message,
    service: Arc<ReminderService>,
    (date, kind): (String, String),
) -> HandlerResult {
    let reply = match service.remove(msg.chat.id.0, &date, &kind).await {
        Ok(true) => "Trash date successfully removed.".to_string(),
        Ok(false) => "Could not remove trash date.".to_string(),
        Err(error) => reply_for_error(error, "/remove", msg.chat.id),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn list(bot: Bot, msg: Message, service: Arc<ReminderService>) -> HandlerResult {
    let reminders = match service.list(Some(msg.chat.id.0)).await {
        Ok(reminders) => reminders,
        Err(error) => {
            log::error!(
                "Listing reminders failed [chat = {}, error = {}]",
                msg.chat.id,
                error
            );
            bot.send_message(msg.chat.id, "Something went wrong, please try again later.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, messages::listing(&reminders))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, messages::help()).await?;
    Ok(())
}

async fn unrecognized(bot: Bot, msg: Message) -> HandlerResult {
    // Only slash commands get a usage hint; other chatter is ignored.
    if msg.text().is_some_and(|text| text.starts_with('/')) {
        bot.send_message(msg.chat.id, format!("Wrong input, use {}", messages::usage("/add")))
            .await?;
    }
    Ok(())
}

fn reply_for_error(error: ReminderError, command: &str, chat: ChatId) -> String {
    match error {
        ReminderError::InvalidDate { .. } => {
            format!("Given date was wrong, use {}", messages::usage(command))
        }
        ReminderError::InvalidKind { .. } => {
            format!("Invalid trash type, use one of {}", messages::kind_tokens())
        }
        error => {
            log::error!(
                "Reminder operation failed [chat = {}, error = {}]",
                chat,
                error
            );
            "Something went wrong, please try again later.".to_string()
        }
    }
}
