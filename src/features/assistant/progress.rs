//! # Progress Log
//!
//! Memory-exercise progress snapshots and a tabular summary of them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

/// One persisted progress snapshot (running totals at the time of writing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEntry {
    pub date: String,
    pub success: i64,
    pub failure: i64,
    pub tasks_completed: i64,
}

/// Format `now` as a progress timestamp in the given UTC offset
pub fn progress_timestamp(now: DateTime<Utc>, offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Summary over all recorded progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub entries: Vec<ProgressEntry>,
}

impl ProgressReport {
    pub fn from_entries(entries: Vec<ProgressEntry>) -> Self {
        ProgressReport { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ProgressEntry> {
        self.entries.last()
    }

    /// Share of successful attempts in the latest snapshot, 0.0..=1.0
    pub fn success_ratio(&self) -> Option<f64> {
        let latest = self.latest()?;
        let attempts = latest.success + latest.failure;
        if attempts == 0 {
            None
        } else {
            Some(latest.success as f64 / attempts as f64)
        }
    }

    /// Plain-text table of the log
    pub fn render_table(&self) -> String {
        if self.entries.is_empty() {
            return "No progress recorded yet. Start answering to track progress!".to_string();
        }

        let mut out = format!(
            "{:<20} {:>12} {:>12} {:>15}\n",
            "Date", "Success Rate", "Failure Rate", "Tasks Completed"
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "{:<20} {:>12} {:>12} {:>15}\n",
                entry.date, entry.success, entry.failure, entry.tasks_completed
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(success: i64, failure: i64) -> ProgressEntry {
        ProgressEntry {
            date: "2025-01-01 10:00:00".to_string(),
            success,
            failure,
            tasks_completed: success + failure,
        }
    }

    #[test]
    fn test_progress_timestamp_applies_offset() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0).unwrap();
        assert_eq!(progress_timestamp(now, 330), "2025-01-02 01:30:00");
        assert_eq!(progress_timestamp(now, 0), "2025-01-01 20:00:00");
    }

    #[test]
    fn test_success_ratio_uses_latest() {
        let report = ProgressReport::from_entries(vec![entry(0, 1), entry(3, 1)]);
        assert_eq!(report.success_ratio(), Some(0.75));
        assert_eq!(report.latest().unwrap().tasks_completed, 4);
    }

    #[test]
    fn test_empty_report() {
        let report = ProgressReport::from_entries(vec![]);
        assert!(report.is_empty());
        assert_eq!(report.success_ratio(), None);
        assert!(report.render_table().starts_with("No progress recorded yet"));
    }

    #[test]
    fn test_render_table_lists_rows() {
        let report = ProgressReport::from_entries(vec![entry(1, 0), entry(1, 1)]);
        let table = report.render_table();
        assert_eq!(table.lines().count(), 3);
        assert!(table.starts_with("Date"));
    }
}
