//! # Reminder Scheduler
//!
//! Polls the reminder table on a fixed interval and announces every reminder
//! whose time string and weekday match the sampled instant. Non-repeating
//! reminders are removed right after dispatch.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with exact-minute matching, per-occurrence dedup and
//!   bounded fire-and-forget delivery

use crate::core::NotifierError;
use crate::database::Database;
use crate::features::reminders::model::{ReminderId, ReminderRecord, Repeat};
use crate::features::speech::Notifier;
use chrono::{DateTime, Datelike, Local, TimeZone, Weekday};
use dashmap::DashMap;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

/// One sampled instant, shared by every record in a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInstant {
    /// `HH:MM AM/PM`
    pub time: String,
    pub weekday: Weekday,
    /// Date plus minute; identifies one firing occurrence
    pub occurrence: String,
}

impl TickInstant {
    pub fn sample<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        TickInstant {
            time: now.format("%I:%M %p").to_string(),
            weekday: now.weekday(),
            occurrence: now.format("%Y-%m-%d %I:%M %p").to_string(),
        }
    }
}

/// What a single tick did
#[derive(Debug, Default)]
pub struct TickReport {
    /// Reminders handed to the notifier
    pub fired: Vec<ReminderId>,
    /// Non-repeating reminders deleted after firing
    pub removed: Vec<ReminderId>,
    /// Due reminders suppressed because they already fired this occurrence
    pub suppressed: Vec<ReminderId>,
    /// Set when the store snapshot failed and nothing was dispatched
    pub skipped: bool,
    deliveries: JoinSet<()>,
}

impl TickReport {
    /// Wait for this tick's notifications to finish (or time out)
    pub async fn wait_for_deliveries(&mut self) {
        while let Some(result) = self.deliveries.join_next().await {
            if let Err(e) = result {
                error!("Notification task panicked: {e}");
            }
        }
    }
}

/// Background reminder matcher
pub struct ReminderScheduler {
    database: Database,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    notify_timeout: Duration,
    /// Occurrence each reminder last fired in, pruned to the current minute
    fired: DashMap<ReminderId, String>,
}

impl ReminderScheduler {
    pub fn new(
        database: Database,
        notifier: Arc<dyn Notifier>,
        poll_interval: Duration,
        notify_timeout: Duration,
    ) -> Self {
        ReminderScheduler {
            database,
            notifier,
            poll_interval,
            notify_timeout,
            fired: DashMap::new(),
        }
    }

    /// Spawn the polling loop. It runs until the returned handle is stopped or dropped.
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Reminder scheduler started (interval: {:?}, notifier: {})",
            self.poll_interval,
            self.notifier.name()
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut report = self.tick().await;
                    if !report.fired.is_empty() {
                        debug!(
                            "Tick fired {} reminder(s), removed {}",
                            report.fired.len(),
                            report.removed.len()
                        );
                    }
                    // Deliveries keep running on their own tasks
                    report.deliveries.detach_all();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Reminder scheduler stopped");
    }

    /// Run one tick against the local clock
    pub async fn tick(&self) -> TickReport {
        self.tick_at(&Local::now()).await
    }

    /// Run one tick against a given instant
    pub async fn tick_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TickReport
    where
        Tz::Offset: std::fmt::Display,
    {
        let instant = TickInstant::sample(now);
        let mut report = TickReport::default();

        self.fired
            .retain(|_, occurrence| *occurrence == instant.occurrence);

        let reminders = match self.database.list_reminders().await {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!("Skipping reminder tick at {}: {e}", instant.time);
                report.skipped = true;
                return report;
            }
        };

        for reminder in reminders {
            if !reminder.is_due(&instant.time, instant.weekday) {
                continue;
            }

            if !self.mark_fired(reminder.id, &instant) {
                debug!(
                    "Reminder {} already fired for {}",
                    reminder.id, instant.occurrence
                );
                report.suppressed.push(reminder.id);
                continue;
            }

            info!(
                "Reminder {} due: '{}' ({})",
                reminder.id, reminder.task, reminder.repeat
            );
            self.dispatch(&reminder, &mut report.deliveries);
            report.fired.push(reminder.id);

            if reminder.repeat == Repeat::None {
                match self.database.remove_reminder(reminder.id).await {
                    Ok(true) => report.removed.push(reminder.id),
                    Ok(false) => debug!("Reminder {} was already removed", reminder.id),
                    Err(e) => warn!("Failed to remove fired reminder {}: {e}", reminder.id),
                }
            }
        }

        report
    }

    /// Record that `id` fired for this occurrence. False if it already had.
    fn mark_fired(&self, id: ReminderId, instant: &TickInstant) -> bool {
        match self.fired.insert(id, instant.occurrence.clone()) {
            Some(previous) => previous != instant.occurrence,
            None => true,
        }
    }

    /// Announce a reminder on its own task, bounded by the notify timeout
    fn dispatch(&self, reminder: &ReminderRecord, deliveries: &mut JoinSet<()>) {
        let notifier = self.notifier.clone();
        let timeout = self.notify_timeout;
        let message = reminder.announcement();
        let id = reminder.id;

        deliveries.spawn(async move {
            let result = match tokio::time::timeout(timeout, notifier.notify(&message)).await {
                Ok(result) => result,
                Err(_) => Err(NotifierError::TimedOut(timeout)),
            };
            if let Err(e) = result {
                warn!("Notification for reminder {id} failed ({}): {e}", notifier.name());
            }
        });
    }
}

/// Handle to a running scheduler loop
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to exit
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Reminder scheduler task failed: {e}");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
