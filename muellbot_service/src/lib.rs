mod fire;
mod service;

pub use fire::DeliveryFireWorker;
pub use service::{ReminderError, ReminderService};

#[cfg(test)]
mod tests;
