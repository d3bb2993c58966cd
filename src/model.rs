use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{GitheatError, Result};

pub const SCHEMA_VERSION: u32 = 1;

/// Weekday names in grid row order (row 0 is Sunday).
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub short_hash: String,
    pub timestamp: DateTime<FixedOffset>,
    pub author: String,
    pub author_email: String,
    pub subject: String,
}

impl Commit {
    /// Calendar day of the commit in its own timezone.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Row index of a weekday in the grid, Sunday = 0.
pub fn weekday_row(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Parse a weekday given as a full name or abbreviation ("Tue", "thurs.", "Sat").
pub fn parse_day_name(input: &str) -> Result<Weekday> {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();
    let name = lowered.strip_suffix('.').unwrap_or(&lowered);
    let weekday = match name {
        "sun" | "sunday" => Weekday::Sun,
        "mon" | "monday" => Weekday::Mon,
        "tu" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "th" | "thr" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        _ => {
            return Err(GitheatError::InvalidFilter(format!(
                "'{trimmed}' does not match required format: day abbreviation"
            )))
        }
    };
    Ok(weekday)
}

/// Set of weekdays used as a filter. An empty set means "no restriction".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySet {
    days: [bool; 7],
}

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_weekdays<I: IntoIterator<Item = Weekday>>(weekdays: I) -> Self {
        let mut set = Self::new();
        for weekday in weekdays {
            set.days[weekday_row(weekday)] = true;
        }
        set
    }

    /// Flip membership of the weekday at `row` (0 = Sunday). Out of range rows are ignored.
    pub fn toggle(&mut self, row: usize) {
        if let Some(slot) = self.days.get_mut(row) {
            *slot = !*slot;
        }
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days[weekday_row(weekday)]
    }

    pub fn is_empty(&self) -> bool {
        !self.days.iter().any(|d| *d)
    }

    pub fn allows(&self, weekday: Weekday) -> bool {
        self.is_empty() || self.contains(weekday)
    }

    pub fn names(&self) -> Vec<&'static str> {
        DAYS.iter()
            .zip(self.days.iter())
            .filter(|(_, on)| **on)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub commits: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitterEntry {
    pub author: String,
    pub commits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub days: Vec<DayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_committers: Option<Vec<CommitterEntry>>,
}
