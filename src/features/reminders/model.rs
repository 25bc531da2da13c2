//! # Reminder Model
//!
//! Persisted reminder records, recurrence policy and weekday sets.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::RequestError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekdays in storage order
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Row id of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(pub i64);

impl std::fmt::Display for ReminderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Recurrence policy of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Repeat {
    /// Fire once, then delete
    None,
    /// Fire on every day
    Daily,
    /// Fire only on the listed weekdays
    Weekly,
}

impl Repeat {
    /// Text stored in the `repeat` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Repeat::None => "None",
            Repeat::Daily => "Daily",
            Repeat::Weekly => "Weekly",
        }
    }
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Repeat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "once" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            _ => Err(RequestError::UnknownRepeat(s.to_string())),
        }
    }
}

/// Full English weekday name, as `%A` formats it
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday name (full or abbreviated, any case)
pub fn parse_weekday(name: &str) -> Result<Weekday, RequestError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| RequestError::UnknownWeekday(name.to_string()))
}

/// Ordered, de-duplicated set of weekdays
///
/// Always iterates Monday through Sunday, so the stored form is canonical
/// regardless of the order days were selected in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet {
    bits: u8,
}

impl WeekdaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(day: Weekday) -> Self {
        let mut set = Self::empty();
        set.insert(day);
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.bits |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.bits & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.iter().copied().filter(move |d| self.contains(*d))
    }

    /// Whether a `%A`-formatted day name is in the set
    pub fn contains_name(&self, name: &str) -> bool {
        self.iter().any(|d| weekday_name(d) == name)
    }

    /// Parse the stored comma-joined form. Unknown tokens are dropped.
    pub fn from_stored(stored: &str) -> Self {
        stored
            .split(',')
            .filter_map(|token| {
                let token = token.trim();
                if token.is_empty() {
                    None
                } else {
                    parse_weekday(token).ok()
                }
            })
            .collect()
    }

    /// Parse user-supplied names, rejecting unknown ones
    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, RequestError> {
        let mut set = Self::empty();
        for name in names {
            set.insert(parse_weekday(name.as_ref())?);
        }
        Ok(set)
    }

    /// Canonical comma-joined form for the `days` column
    pub fn to_stored(&self) -> String {
        self.iter().map(weekday_name).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_stored())
    }
}

/// A persisted reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub task: String,
    /// `HH:MM AM/PM`, compared by exact string equality
    pub time: String,
    pub repeat: Repeat,
    pub days: WeekdaySet,
}

impl ReminderRecord {
    /// Whether the record is due at the sampled time and weekday.
    /// Only `Weekly` records consult `days`; `Daily` and one-off records
    /// fire on whatever day their time comes round.
    pub fn is_due(&self, time: &str, weekday: Weekday) -> bool {
        if self.time != time {
            return false;
        }

        match self.repeat {
            Repeat::Weekly => self.days.contains(weekday),
            Repeat::Daily | Repeat::None => true,
        }
    }

    /// Text handed to the notifier
    pub fn announcement(&self) -> String {
        format!("Time for {}", self.task)
    }

    /// One-line listing for the scheduled tasks view
    pub fn summary(&self) -> String {
        format!(
            "⏰ {} - {} ({}) on {}",
            self.time, self.task, self.repeat, self.days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: &str, repeat: Repeat, days: &[Weekday]) -> ReminderRecord {
        ReminderRecord {
            id: ReminderId(1),
            task: "Take medicine".to_string(),
            time: time.to_string(),
            repeat,
            days: days.iter().copied().collect(),
        }
    }

    #[test]
    fn test_repeat_display_and_parse() {
        assert_eq!(Repeat::None.to_string(), "None");
        assert_eq!(Repeat::Daily.to_string(), "Daily");
        assert_eq!(Repeat::Weekly.to_string(), "Weekly");
        assert_eq!("None".parse::<Repeat>().unwrap(), Repeat::None);
        assert_eq!("DAILY".parse::<Repeat>().unwrap(), Repeat::Daily);
        assert_eq!("weekly".parse::<Repeat>().unwrap(), Repeat::Weekly);
        assert!(matches!(
            "monthly".parse::<Repeat>(),
            Err(RequestError::UnknownRepeat(_))
        ));
    }

    #[test]
    fn test_weekday_set_is_canonical() {
        let set: WeekdaySet = [Weekday::Fri, Weekday::Mon, Weekday::Fri]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_stored(), "Monday,Friday");
    }

    #[test]
    fn test_weekday_set_from_stored() {
        let set = WeekdaySet::from_stored("Tuesday, Sunday,,Funday");
        assert!(set.contains(Weekday::Tue));
        assert!(set.contains(Weekday::Sun));
        assert_eq!(set.len(), 2);
        assert!(WeekdaySet::from_stored("").is_empty());
    }

    #[test]
    fn test_parse_names_rejects_unknown() {
        let set = WeekdaySet::parse_names(&["monday", "Wed"]).unwrap();
        assert_eq!(set.to_stored(), "Monday,Wednesday");
        assert_eq!(
            WeekdaySet::parse_names(&["Someday"]),
            Err(RequestError::UnknownWeekday("Someday".to_string()))
        );
    }

    #[test]
    fn test_contains_name() {
        let set = WeekdaySet::single(Weekday::Mon);
        assert!(set.contains_name("Monday"));
        assert!(!set.contains_name("Mon"));
        assert!(!set.contains_name("Tuesday"));
    }

    #[test]
    fn test_weekly_gates_on_days() {
        let monday_only = record("09:05 AM", Repeat::Weekly, &[Weekday::Mon]);
        assert!(monday_only.is_due("09:05 AM", Weekday::Mon));
        assert!(!monday_only.is_due("09:05 AM", Weekday::Tue));

        let tuesday_only = record("09:05 AM", Repeat::Weekly, &[Weekday::Tue]);
        assert!(!tuesday_only.is_due("09:05 AM", Weekday::Mon));
    }

    #[test]
    fn test_weekly_with_no_days_never_fires() {
        let none_selected = record("09:05 AM", Repeat::Weekly, &[]);
        for day in WEEK {
            assert!(!none_selected.is_due("09:05 AM", day));
        }
    }

    #[test]
    fn test_daily_fires_on_any_weekday() {
        let daily = record("08:00 AM", Repeat::Daily, &[Weekday::Wed]);
        for day in WEEK {
            assert!(daily.is_due("08:00 AM", day));
        }
    }

    #[test]
    fn test_time_match_is_exact() {
        let daily = record("08:00 AM", Repeat::Daily, &[]);
        assert!(!daily.is_due("8:00 AM", Weekday::Mon));
        assert!(!daily.is_due("08:00 am", Weekday::Mon));
        assert!(!daily.is_due("08:00 PM", Weekday::Mon));
        assert!(!daily.is_due("08:01 AM", Weekday::Mon));
    }

    #[test]
    fn test_summary_and_announcement() {
        let r = record("08:00 AM", Repeat::Weekly, &[Weekday::Mon, Weekday::Fri]);
        assert_eq!(r.announcement(), "Time for Take medicine");
        assert_eq!(
            r.summary(),
            "⏰ 08:00 AM - Take medicine (Weekly) on Monday,Friday"
        );
    }
}
