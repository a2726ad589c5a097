mod memory;
mod reminder_store;

pub mod sqlite;

pub use memory::InMemoryReminderStore;
pub use reminder_store::{ReminderStore, StoreError};
