//! # Assistant Feature
//!
//! Memory-exercise chat sessions backed by a hosted model, with progress logging.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod gemini;
pub mod memory;
pub mod progress;
pub mod session;

pub use gemini::{ChatModel, GeminiClient};
pub use memory::{KeywordJudge, MemoryAssistant, ResponseJudge};
pub use progress::{progress_timestamp, ProgressEntry, ProgressReport};
pub use session::{ChatRole, ChatTurn, ExerciseOutcome, ExerciseSession, SessionRegistry};
