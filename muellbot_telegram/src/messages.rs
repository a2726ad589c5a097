use teloxide::utils::markdown;

use muellbot_models::reminder::{DATE_FORMAT, Reminder, TrashKind};

pub(crate) fn kind_tokens() -> String {
    TrashKind::ALL.map(TrashKind::token).join("/")
}

pub(crate) fn usage(command: &str) -> String {
    format!("{command} dd.mm.yyyy [{}]", kind_tokens())
}

pub(crate) fn help() -> String {
    format!("Hi! Use\n{}\nto add a trash date", usage("/add"))
}

pub(crate) fn added(reminder: &Reminder) -> String {
    format!(
        "Noted {} for {}.",
        reminder.key.kind,
        reminder.key.due_date.format(DATE_FORMAT)
    )
}

pub(crate) fn kind_emojis(kind: TrashKind) -> &'static str {
    match kind {
        TrashKind::Bio => "🍆🥕🥬🥦",
        TrashKind::Rest => "🥡",
        TrashKind::Papier => "📜📰🎫",
        TrashKind::Plastik => "♸🍬",
    }
}

/// MarkdownV2 body of the fired notification.
pub(crate) fn notification(reminder: &Reminder) -> String {
    let kind = reminder.key.kind;
    format!(
        "🗑🗑🗑 *Tomorrow is trash date\\!* 🗑🗑🗑\n\n_{}_: {}",
        markdown::escape(kind.token()),
        kind_emojis(kind)
    )
}

/// MarkdownV2 listing, one line per pending reminder.
pub(crate) fn listing(reminders: &[Reminder]) -> String {
    let mut text = String::from("*I have noted the following dates:*\n");
    for reminder in reminders {
        let line = format!(
            "{}  {}\n",
            reminder.key.due_date.format(DATE_FORMAT),
            reminder.key.kind
        );
        text.push_str(&markdown::escape(&line));
    }
    text
}
