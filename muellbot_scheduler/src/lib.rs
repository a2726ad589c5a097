mod scheduler;
mod timer_scheduler;

pub mod delivery;

pub use scheduler::{ReminderFiredHandler, ReminderScheduler, ScheduleRequest};
pub use timer_scheduler::TimerScheduler;
