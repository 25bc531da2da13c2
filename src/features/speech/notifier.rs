//! # Feature: Spoken Notifications
//!
//! Turns a due reminder into an audible cue. Text is synthesized to MP3 with
//! the translate TTS endpoint, then handed to a local audio player.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release with TTS synthesis and player playback

use crate::core::NotifierError;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Google's TTS endpoint rejects long inputs
const MAX_TTS_CHARS: usize = 200;

/// Something that can announce a reminder
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifierError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Writes announcements to the log only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifierError> {
        info!("🔔 {message}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Synthesizes speech and plays it through an external player
#[derive(Clone)]
pub struct SpeechNotifier {
    client: reqwest::Client,
    language: String,
    player: String,
    output_path: PathBuf,
}

impl SpeechNotifier {
    pub fn new(language: String, player: String, output_path: impl Into<PathBuf>) -> Self {
        SpeechNotifier {
            client: reqwest::Client::new(),
            language,
            player,
            output_path: output_path.into(),
        }
    }

    /// Fetch MP3 bytes for `text`
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, NotifierError> {
        let text = truncate_chars(text, MAX_TTS_CHARS);

        let response = self
            .client
            .get(TTS_ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| NotifierError::Synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::Synthesis(format!(
                "TTS endpoint returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NotifierError::Synthesis(e.to_string()))?;
        if bytes.is_empty() {
            return Err(NotifierError::Synthesis("empty audio response".to_string()));
        }

        Ok(bytes.to_vec())
    }

    /// Per-delivery audio file next to the configured output path, so
    /// overlapping deliveries never share a file
    fn delivery_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("reminder");
        let extension = self
            .output_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3");
        self.output_path
            .with_file_name(format!("{stem}-{}.{extension}", Uuid::new_v4()))
    }

    /// Play a synthesized file with the configured player. The player is
    /// killed if this future is dropped, e.g. by a dispatch timeout.
    async fn play(&self, path: &Path) -> Result<(), NotifierError> {
        let (program, args) = player_invocation(&self.player);

        let output = Command::new(program)
            .args(args)
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                error!("Audio player '{program}' could not be started: {e}");
                NotifierError::Playback(format!("{program}: {e}"))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(NotifierError::Playback(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl Notifier for SpeechNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifierError> {
        let start = Instant::now();

        let audio = self.synthesize(message).await?;
        let path = self.delivery_path();
        fs::write(&path, &audio).await?;
        debug!(
            "Synthesized {} bytes of speech to {}",
            audio.len(),
            path.display()
        );

        let played = self.play(&path).await;
        if let Err(e) = fs::remove_file(&path).await {
            warn!("Could not remove {}: {e}", path.display());
        }
        played?;

        info!("Announced '{message}' in {:?}", start.elapsed());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "speech"
    }
}

/// Split a player setting like `"mpg123 -q"` into program and leading args
fn player_invocation(player: &str) -> (&str, Vec<&str>) {
    let mut parts = player.split_whitespace();
    let program = parts.next().unwrap_or("mpg123");
    (program, parts.collect())
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
