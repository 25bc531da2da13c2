//! # Reminder Requests
//!
//! Validates reminder form input into the `(task, time, repeat, days)` tuple
//! the store accepts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::{RequestError, StoreResult};
use crate::database::Database;
use crate::features::reminders::model::{weekday_name, ReminderId, Repeat, WeekdaySet};
use chrono::{Datelike, Weekday};
use log::info;
use regex::Regex;
use std::sync::OnceLock;

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0[1-9]|1[0-2]):[0-5][0-9] (AM|PM)$").expect("time pattern is valid")
    })
}

/// A validated reminder ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub task: String,
    pub time: String,
    pub repeat: Repeat,
    pub days: WeekdaySet,
}

impl ReminderRequest {
    /// Build from the hour/minute/meridiem pickers of the reminder form.
    ///
    /// An empty day selection falls back to `today`.
    pub fn from_form<S: AsRef<str>>(
        task: &str,
        hour: u32,
        minute: u32,
        meridiem: &str,
        repeat: &str,
        days: &[S],
        today: Weekday,
    ) -> Result<Self, RequestError> {
        if !(1..=12).contains(&hour) {
            return Err(RequestError::InvalidHour(hour));
        }
        if minute > 59 {
            return Err(RequestError::InvalidMinute(minute));
        }
        let meridiem = match meridiem.trim().to_uppercase().as_str() {
            m @ ("AM" | "PM") => m.to_string(),
            _ => return Err(RequestError::InvalidMeridiem(meridiem.to_string())),
        };

        let time = format!("{hour:02}:{minute:02} {meridiem}");
        Self::new(task, &time, repeat, days, today)
    }

    /// Build from an already formatted `HH:MM AM/PM` time
    pub fn new<S: AsRef<str>>(
        task: &str,
        time: &str,
        repeat: &str,
        days: &[S],
        today: Weekday,
    ) -> Result<Self, RequestError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(RequestError::EmptyTask);
        }
        if !time_pattern().is_match(time) {
            return Err(RequestError::InvalidTime(time.to_string()));
        }

        let repeat = repeat.parse::<Repeat>()?;
        let mut days = WeekdaySet::parse_names(days)?;
        if days.is_empty() {
            days.insert(today);
        }

        Ok(ReminderRequest {
            task: task.to_string(),
            time: time.to_string(),
            repeat,
            days,
        })
    }

    /// Same as [`ReminderRequest::from_form`] with today taken from the local clock
    pub fn from_form_today<S: AsRef<str>>(
        task: &str,
        hour: u32,
        minute: u32,
        meridiem: &str,
        repeat: &str,
        days: &[S],
    ) -> Result<Self, RequestError> {
        let today = chrono::Local::now().weekday();
        Self::from_form(task, hour, minute, meridiem, repeat, days, today)
    }

    /// Persist the request
    pub async fn submit(&self, database: &Database) -> StoreResult<ReminderId> {
        let id = database
            .add_reminder(&self.task, &self.time, self.repeat, self.days)
            .await?;
        info!("{}", self.confirmation());
        Ok(id)
    }

    /// Confirmation line shown after submission
    pub fn confirmation(&self) -> String {
        let when = if self.repeat == Repeat::Weekly {
            self.days
                .iter()
                .map(weekday_name)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "Everyday".to_string()
        };
        format!(
            "Task '{}' set for {} ({}) on {}",
            self.task, self.time, self.repeat, when
        )
    }
}
