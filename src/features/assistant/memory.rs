//! # Memory Assistant
//!
//! Chat-driven memory exercises. Each reply is judged, counted against the
//! user's session and appended to the progress log.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

use crate::database::Database;
use crate::features::assistant::gemini::ChatModel;
use crate::features::assistant::progress::{progress_timestamp, ProgressReport};
use crate::features::assistant::session::{ExerciseOutcome, SessionRegistry};
use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// Decides whether a model reply means the user got the exercise right
pub trait ResponseJudge: Send + Sync {
    fn judge(&self, reply: &str) -> ExerciseOutcome;
}

/// Counts a reply as a success when it praises the answer
#[derive(Debug, Clone, Default)]
pub struct KeywordJudge;

impl ResponseJudge for KeywordJudge {
    fn judge(&self, reply: &str) -> ExerciseOutcome {
        let lower = reply.to_lowercase();
        if lower.contains("correct") || lower.contains("good job") {
            ExerciseOutcome::Success
        } else {
            ExerciseOutcome::Failure
        }
    }
}

pub struct MemoryAssistant {
    model: Arc<dyn ChatModel>,
    judge: Arc<dyn ResponseJudge>,
    database: Database,
    sessions: SessionRegistry,
    progress_offset_minutes: i32,
}

impl MemoryAssistant {
    pub fn new(
        model: Arc<dyn ChatModel>,
        judge: Arc<dyn ResponseJudge>,
        database: Database,
        progress_offset_minutes: i32,
    ) -> Self {
        MemoryAssistant {
            model,
            judge,
            database,
            sessions: SessionRegistry::new(),
            progress_offset_minutes,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Answer one user message. Returns `None` for an empty or repeated input.
    ///
    /// Counters are updated in place in the registry, so overlapping calls
    /// on one session each count their own exchange.
    pub async fn respond(&self, session_id: &Uuid, input: &str) -> Result<Option<String>> {
        let snapshot = self
            .sessions
            .get(session_id)
            .ok_or_else(|| anyhow!("Unknown exercise session {session_id}"))?;

        let input = input.trim();
        if input.is_empty() || snapshot.is_repeat(input) {
            debug!("Ignoring repeated or empty input for session {session_id}");
            return Ok(None);
        }

        let reply = self.model.reply(&snapshot.history, input).await?;
        let outcome = self.judge.judge(&reply);
        let session = self
            .sessions
            .record(session_id, input, &reply, outcome)
            .ok_or_else(|| anyhow!("Exercise session {session_id} closed mid-reply"))?;

        let recorded_at = progress_timestamp(Utc::now(), self.progress_offset_minutes);
        if let Err(e) = self
            .database
            .add_progress(
                &recorded_at,
                session.success_count,
                session.failure_count,
                session.task_count,
            )
            .await
        {
            warn!("Failed to record exercise progress: {e}");
        }

        info!(
            "Session {session_id}: {:?} (successes {}, failures {}, tasks {})",
            outcome, session.success_count, session.failure_count, session.task_count
        );

        Ok(Some(reply))
    }

    pub async fn progress_report(&self) -> Result<ProgressReport> {
        let entries = self.database.list_progress().await?;
        Ok(ProgressReport::from_entries(entries))
    }

    /// Line-oriented exercise chat: one session from open to end of input.
    /// A failed model call is reported and the chat goes on.
    pub async fn run_console<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session_id = self.sessions.open();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            match self.respond(&session_id, &line).await {
                Ok(Some(reply)) => output.write_all(format!("🤖 {reply}\n").as_bytes()).await?,
                Ok(None) => {}
                Err(e) => {
                    warn!("Memory assistant reply failed: {e}");
                    output
                        .write_all(b"Sorry, I couldn't answer that. Please try again.\n")
                        .await?;
                }
            }
            output.flush().await?;
        }

        if let Some(session) = self.sessions.close(&session_id) {
            info!(
                "Exercise session ended: {} task(s), {} correct",
                session.task_count, session.success_count
            );
        }
        Ok(())
    }
}
