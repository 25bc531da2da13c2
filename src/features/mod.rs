//! # Features Layer
//!
//! Reminders, spoken delivery and the memory-exercise assistant.

pub mod assistant;
pub mod reminders;
pub mod speech;

pub use assistant::{
    ChatModel, GeminiClient, KeywordJudge, MemoryAssistant, ProgressEntry, ProgressReport,
    SessionRegistry,
};
pub use reminders::{
    ReminderId, ReminderRecord, ReminderRequest, ReminderScheduler, Repeat, SchedulerHandle,
    WeekdaySet,
};
pub use speech::{LogNotifier, Notifier, SpeechNotifier};

/// Crate version, for startup logs
pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
