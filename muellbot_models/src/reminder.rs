use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Opaque identifier of who receives a reminder (one chat).
pub type RecipientId = i64;

/// Format collection dates are written in by users and rendered back to them.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrashKind {
    Bio,
    Rest,
    Papier,
    Plastik,
}

impl TrashKind {
    pub const ALL: [TrashKind; 4] = [
        TrashKind::Bio,
        TrashKind::Rest,
        TrashKind::Papier,
        TrashKind::Plastik,
    ];

    pub fn token(self) -> &'static str {
        match self {
            TrashKind::Bio => "bio",
            TrashKind::Rest => "rest",
            TrashKind::Papier => "papier",
            TrashKind::Plastik => "plastik",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown trash kind {0:?}")]
pub struct ParseTrashKindError(pub String);

impl FromStr for TrashKind {
    type Err = ParseTrashKindError;

    // Tokens are matched verbatim. No aliases, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bio" => Ok(TrashKind::Bio),
            "rest" => Ok(TrashKind::Rest),
            "papier" => Ok(TrashKind::Papier),
            "plastik" => Ok(TrashKind::Plastik),
            other => Err(ParseTrashKindError(other.to_string())),
        }
    }
}

impl fmt::Display for TrashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Composite identity of a reminder. At most one reminder exists per key at
/// any time; adding the same key again replaces the previous record and its
/// timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub recipient_id: RecipientId,
    pub due_date: NaiveDate,
    pub kind: TrashKind,
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.recipient_id,
            self.due_date.format(DATE_FORMAT),
            self.kind
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReminderState {
    Pending,
    Fired,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub key: ReminderKey,
    pub fire_at: NaiveDateTime,
    pub state: ReminderState,
}

impl Reminder {
    pub fn pending(recipient_id: RecipientId, due_date: NaiveDate, kind: TrashKind) -> Self {
        Self {
            key: ReminderKey {
                recipient_id,
                due_date,
                kind,
            },
            fire_at: fire_instant(due_date),
            state: ReminderState::Pending,
        }
    }
}

/// The notification goes out at midnight one day ahead of the collection.
pub fn fire_instant(due_date: NaiveDate) -> NaiveDateTime {
    due_date
        .checked_sub_days(Days::new(1))
        .expect("Not realistic to underflow")
        .and_time(NaiveTime::MIN)
}
