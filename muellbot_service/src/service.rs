use std::sync::Arc;

use thiserror::Error;

use muellbot_models::chrono::NaiveDate;
use muellbot_models::reminder::{DATE_FORMAT, RecipientId, Reminder, ReminderKey, TrashKind};
use muellbot_scheduler::{ReminderScheduler, ScheduleRequest};
use muellbot_storage::{ReminderStore, StoreError};

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("could not parse date {input:?}, expected dd.mm.yyyy")]
    InvalidDate { input: String },

    #[error("unknown trash kind {input:?}")]
    InvalidKind { input: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("scheduler failed")]
    Scheduler(#[source] anyhow::Error),
}

/// Orchestrates the durable store and the timer engine. The only component
/// the chat surface talks to.
pub struct ReminderService {
    store: Arc<dyn ReminderStore>,
    scheduler: Arc<dyn ReminderScheduler>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn ReminderStore>, scheduler: Arc<dyn ReminderScheduler>) -> Self {
        Self { store, scheduler }
    }

    /// Registers a reminder. A reminder under the same (recipient, date,
    /// kind) key replaces the previous one, timer included. Invalid input
    /// is rejected before anything is mutated.
    pub async fn add(
        &self,
        recipient_id: RecipientId,
        date: &str,
        kind: &str,
    ) -> Result<Reminder, ReminderError> {
        let due_date = parse_due_date(date)?;
        let kind = parse_kind(kind)?;
        let reminder = Reminder::pending(recipient_id, due_date, kind);

        self.store.put(&reminder).await?;

        if let Err(error) = self
            .scheduler
            .schedule_reminder(ScheduleRequest::new(reminder.clone()))
            .await
        {
            // A durable record without an armed timer would never fire, so
            // take the record back out before reporting the failure.
            self.store.delete(&reminder.key).await?;
            return Err(ReminderError::Scheduler(error));
        }

        log::info!("Added reminder [key = {}]", reminder.key);
        Ok(reminder)
    }

    /// Returns whether a pending reminder was actually removed. The armed
    /// timer is the claim point: once the timer has fired or begun firing,
    /// removal reports false and the fire path owns the record.
    pub async fn remove(
        &self,
        recipient_id: RecipientId,
        date: &str,
        kind: &str,
    ) -> Result<bool, ReminderError> {
        let due_date = parse_due_date(date)?;
        let kind = parse_kind(kind)?;
        let key = ReminderKey {
            recipient_id,
            due_date,
            kind,
        };

        let cancelled = self
            .scheduler
            .cancel_reminder(&key)
            .await
            .map_err(ReminderError::Scheduler)?;

        if !cancelled {
            return Ok(false);
        }

        self.store.delete(&key).await?;
        log::info!("Removed reminder [key = {}]", key);
        Ok(true)
    }

    /// Pending reminders, ordered by due date for display. Nothing pending
    /// is an empty list, never an error.
    pub async fn list(
        &self,
        recipient_id: Option<RecipientId>,
    ) -> Result<Vec<Reminder>, ReminderError> {
        let mut reminders = match recipient_id {
            Some(recipient_id) => self.store.get_for_recipient(recipient_id).await?,
            None => self.store.get_all().await?,
        };

        reminders.sort_by_key(|reminder| reminder.key.due_date);
        Ok(reminders)
    }

    /// Re-arms a timer for every stored reminder. Fire instants that passed
    /// while the process was down fire immediately.
    pub async fn restore(&self) -> Result<usize, ReminderError> {
        let pending = self.store.get_all().await?;
        let count = pending.len();

        for reminder in pending {
            self.scheduler
                .schedule_reminder(ScheduleRequest::new(reminder))
                .await
                .map_err(ReminderError::Scheduler)?;
        }

        log::info!("Restored reminders from the store [count = {}]", count);
        Ok(count)
    }
}

fn parse_due_date(input: &str) -> Result<NaiveDate, ReminderError> {
    let invalid = || ReminderError::InvalidDate {
        input: input.to_string(),
    };

    let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())?;

    // chrono accepts unpadded day and month fields; the command surface is
    // documented as exactly dd.mm.yyyy, so the round trip must match.
    if date.format(DATE_FORMAT).to_string() != input {
        return Err(invalid());
    }

    Ok(date)
}

fn parse_kind(input: &str) -> Result<TrashKind, ReminderError> {
    input.parse().map_err(|_| ReminderError::InvalidKind {
        input: input.to_string(),
    })
}
