// Core layer - configuration and error taxonomy
pub mod core;

// Infrastructure - SQLite persistence
pub mod database;

// Features layer - reminders, speech, assistant
pub mod features;

pub use core::Config;
pub use database::Database;

pub use features::{
    // Assistant
    ChatModel, GeminiClient, KeywordJudge, MemoryAssistant, ProgressEntry, ProgressReport,
    SessionRegistry,
    // Reminders
    ReminderId, ReminderRecord, ReminderRequest, ReminderScheduler, Repeat, SchedulerHandle,
    WeekdaySet,
    // Speech
    LogNotifier, Notifier, SpeechNotifier,
};
