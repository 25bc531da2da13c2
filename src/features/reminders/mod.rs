//! # Reminders Feature
//!
//! Scheduled task reminders with spoken delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod model;
pub mod request;
pub mod scheduler;

pub use model::{parse_weekday, weekday_name, ReminderId, ReminderRecord, Repeat, WeekdaySet};
pub use request::ReminderRequest;
pub use scheduler::{ReminderScheduler, SchedulerHandle, TickInstant, TickReport};
