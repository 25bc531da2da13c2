//! # Exercise Sessions
//!
//! Per-user chat history and exercise counters. A session is opened when a
//! user starts the memory assistant and discarded when they leave.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use dashmap::DashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        ChatTurn {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        ChatTurn {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Whether an exercise reply counted as a success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Default)]
pub struct ExerciseSession {
    pub history: Vec<ChatTurn>,
    pub last_input: Option<String>,
    pub success_count: i64,
    pub failure_count: i64,
    pub task_count: i64,
}

impl ExerciseSession {
    /// True when `input` repeats the previous submission
    pub fn is_repeat(&self, input: &str) -> bool {
        self.last_input.as_deref() == Some(input)
    }

    /// Apply one completed exchange
    pub fn record_exchange(&mut self, input: &str, reply: &str, outcome: ExerciseOutcome) {
        match outcome {
            ExerciseOutcome::Success => self.success_count += 1,
            ExerciseOutcome::Failure => self.failure_count += 1,
        }
        self.task_count += 1;
        self.last_input = Some(input.to_string());
        self.history.push(ChatTurn::user(input));
        self.history.push(ChatTurn::model(reply));
    }

    /// Chat transcript with speaker labels
    pub fn transcript(&self) -> Vec<String> {
        self.history
            .iter()
            .map(|turn| {
                let who = match turn.role {
                    ChatRole::User => "👤 You",
                    ChatRole::Model => "🤖 Bot",
                };
                format!("{who}: {}", turn.text)
            })
            .collect()
    }
}

/// Live sessions keyed by id
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, ExerciseSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, ExerciseSession::default());
        info!("Opened exercise session {id}");
        id
    }

    /// Snapshot of a session
    pub fn get(&self, id: &Uuid) -> Option<ExerciseSession> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Apply one exchange in place and return the updated state.
    /// `None` if the session was closed meanwhile.
    pub fn record(
        &self,
        id: &Uuid,
        input: &str,
        reply: &str,
        outcome: ExerciseOutcome,
    ) -> Option<ExerciseSession> {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.record_exchange(input, reply, outcome);
                Some(entry.clone())
            }
            None => {
                debug!("Session {id} closed before its reply was recorded");
                None
            }
        }
    }

    pub fn close(&self, id: &Uuid) -> Option<ExerciseSession> {
        let removed = self.sessions.remove(id).map(|(_, s)| s);
        if removed.is_some() {
            info!("Closed exercise session {id}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_exchange_updates_counters() {
        let mut session = ExerciseSession::default();
        session.record_exchange("apple", "Correct! Good job.", ExerciseOutcome::Success);
        session.record_exchange("pear", "Not quite.", ExerciseOutcome::Failure);

        assert_eq!(session.success_count, 1);
        assert_eq!(session.failure_count, 1);
        assert_eq!(session.task_count, 2);
        assert_eq!(session.history.len(), 4);
        assert!(session.is_repeat("pear"));
        assert!(!session.is_repeat("apple"));
    }

    #[test]
    fn test_transcript_labels() {
        let mut session = ExerciseSession::default();
        session.record_exchange("hi", "hello", ExerciseOutcome::Failure);
        assert_eq!(session.transcript(), vec!["👤 You: hi", "🤖 Bot: hello"]);
    }

    #[test]
    fn test_registry_lifecycle() {
        let registry = SessionRegistry::new();
        let id = registry.open();
        assert_eq!(registry.len(), 1);

        let updated = registry.record(&id, "a", "b", ExerciseOutcome::Success).unwrap();
        assert_eq!(updated.task_count, 1);
        assert_eq!(registry.get(&id).unwrap().task_count, 1);

        let closed = registry.close(&id).unwrap();
        assert_eq!(closed.success_count, 1);
        assert!(registry.is_empty());
        assert!(registry.get(&id).is_none());
        assert!(registry.record(&id, "c", "d", ExerciseOutcome::Failure).is_none());
    }
}
