use muellbot_models::chrono::{NaiveDate, NaiveDateTime};
use muellbot_models::reminder::{Reminder, ReminderKey, ReminderState};

use crate::StoreError;

#[derive(sqlx::FromRow)]
pub struct ReminderRow {
    pub recipient_id: i64,
    pub due_date: NaiveDate,
    pub kind: String,
    pub fire_at: NaiveDateTime,
    pub state: String,
}

impl From<&Reminder> for ReminderRow {
    fn from(value: &Reminder) -> Self {
        Self {
            recipient_id: value.key.recipient_id,
            due_date: value.key.due_date,
            kind: value.key.kind.to_string(),
            fire_at: value.fire_at,
            state: convert_state(value.state).to_string(),
        }
    }
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = StoreError;

    fn try_from(value: ReminderRow) -> Result<Self, Self::Error> {
        let kind = value
            .kind
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("unknown trash kind {:?}", value.kind)))?;

        Ok(Self {
            key: ReminderKey {
                recipient_id: value.recipient_id,
                due_date: value.due_date,
                kind,
            },
            fire_at: value.fire_at,
            state: parse_state(&value.state),
        })
    }
}

fn convert_state(state: ReminderState) -> &'static str {
    match state {
        ReminderState::Pending => "Pending",
        ReminderState::Fired => "Fired",
        ReminderState::Cancelled => "Cancelled",
    }
}

fn parse_state(state: &str) -> ReminderState {
    match state {
        "Pending" => ReminderState::Pending,
        "Fired" => ReminderState::Fired,
        "Cancelled" => ReminderState::Cancelled,
        other => {
            log::warn!("Unknown state {}, defaulting to Pending", other);
            ReminderState::Pending
        }
    }
}
