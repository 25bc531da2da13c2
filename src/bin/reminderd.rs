use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use recall::core::Config;
use recall::database::Database;
use recall::features::assistant::{GeminiClient, KeywordJudge, MemoryAssistant};
use recall::features::get_app_version;
use recall::features::reminders::ReminderScheduler;
use recall::features::speech::{LogNotifier, Notifier, SpeechNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting reminder service v{}...", get_app_version());

    let database = Database::new(&config.database_path).await.map_err(|e| {
        error!("Failed to open database at {}: {e}", config.database_path);
        anyhow::anyhow!("Database unavailable: {}", e)
    })?;

    match database.list_reminders().await {
        Ok(reminders) if reminders.is_empty() => info!("📋 No tasks scheduled."),
        Ok(reminders) => {
            info!("📋 {} scheduled task(s):", reminders.len());
            for reminder in &reminders {
                info!("  {}", reminder.summary());
            }
        }
        Err(e) => error!("Could not list scheduled tasks: {e}"),
    }

    let notifier: Arc<dyn Notifier> = if config.speech_enabled {
        info!(
            "🔊 Spoken reminders via '{}' ({})",
            config.audio_player, config.speech_language
        );
        Arc::new(SpeechNotifier::new(
            config.speech_language.clone(),
            config.audio_player.clone(),
            config.speech_output_path.clone(),
        ))
    } else {
        info!("🔇 Speech disabled - reminders will only be logged");
        Arc::new(LogNotifier)
    };

    let scheduler = Arc::new(ReminderScheduler::new(
        database.clone(),
        notifier,
        config.poll_interval,
        config.notify_timeout,
    ));
    let handle = scheduler.start();

    // Memory exercises run on stdin when a model key is configured
    let exercises = match config.gemini_api_key.clone() {
        Some(api_key) => {
            let model = GeminiClient::new(api_key, config.gemini_model.clone())?;
            let assistant = MemoryAssistant::new(
                Arc::new(model),
                Arc::new(KeywordJudge),
                database.clone(),
                config.progress_offset_minutes,
            );
            info!(
                "🧠 Memory assistant ready ({}) - type an answer and press Enter",
                config.gemini_model
            );
            Some(tokio::spawn(async move {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                if let Err(e) = assistant.run_console(stdin, tokio::io::stdout()).await {
                    error!("Memory assistant stopped: {e}");
                }
                match assistant.progress_report().await {
                    Ok(report) if !report.is_empty() => {
                        info!("Progress:\n{}", report.render_table())
                    }
                    Ok(_) => {}
                    Err(e) => error!("Could not load exercise progress: {e}"),
                }
            }))
        }
        None => {
            info!("GEMINI_API_KEY not set - memory assistant disabled");
            None
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    info!("Shutting down...");
    if let Some(exercises) = exercises {
        exercises.abort();
    }
    handle.stop().await;
    drop(database);
    info!("Reminder service stopped");

    Ok(())
}
