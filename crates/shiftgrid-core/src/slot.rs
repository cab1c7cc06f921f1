//! Slot types shared by the algebra, layout, and controller.
//!
//! Times are minute-of-day integers. In extended (overnight) grids a value
//! may run past 1440; it is only wrapped when formatted for display.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minute of day. Values above [`MINUTES_PER_DAY`] belong to the next
/// calendar day of an extended grid.
pub type Minute = i32;

pub const MINUTES_PER_DAY: Minute = 24 * 60;

/// Largest minute value accepted from outside the process.
pub const MAX_MINUTE: Minute = 2 * MINUTES_PER_DAY;

/// Slot category. Categories are mutually exclusive at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Vacation,
    Sick,
    Personal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Vacation,
        Category::Sick,
        Category::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Vacation => "vacation",
            Category::Sick => "sick",
            Category::Personal => "personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "vacation" => Ok(Category::Vacation),
            "sick" => Ok(Category::Sick),
            "personal" => Ok(Category::Personal),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// Half-open interval `[start, end)` in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Minute,
    pub end: Minute,
}

impl TimeRange {
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Shares at least one instant with `other`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlaps or shares an endpoint with `other`.
    pub fn touches(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, minute: Minute) -> bool {
        self.start <= minute && minute < self.end
    }
}

/// A contiguous interval owned by one employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: Minute,
    pub end: Minute,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimeSlot {
    pub fn new(start: Minute, end: Minute, category: Category) -> Self {
        Self {
            start,
            end,
            category,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Copy of this slot with a different range, keeping category and note.
    pub fn with_range(&self, start: Minute, end: Minute) -> Self {
        Self {
            start,
            end,
            category: self.category,
            note: self.note.clone(),
        }
    }
}

/// Check one slot arriving from a repository, a file, or user input.
pub fn check_slot(slot: &TimeSlot) -> Result<(), ValidationError> {
    for minute in [slot.start, slot.end] {
        if !(0..=MAX_MINUTE).contains(&minute) {
            return Err(ValidationError::MinuteOutOfRange {
                minute,
                max: MAX_MINUTE,
            });
        }
    }
    if !slot.is_well_formed() {
        return Err(ValidationError::InvalidTimeRange {
            start: slot.start,
            end: slot.end,
        });
    }
    Ok(())
}

/// Reject a whole external slot list if any entry is malformed.
pub fn validate_external(slots: &[TimeSlot]) -> Result<(), ValidationError> {
    slots.iter().try_for_each(check_slot)
}

/// Parse `HH:MM` into minutes. Hours up to 48 are accepted for extended grids.
pub fn parse_minute(s: &str) -> Result<Minute, ValidationError> {
    let invalid = || ValidationError::InvalidTime(s.to_string());
    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: Minute = h.parse().map_err(|_| invalid())?;
    let minutes: Minute = m.parse().map_err(|_| invalid())?;
    if !(0..60).contains(&minutes) || hours < 0 {
        return Err(invalid());
    }
    let total = hours * 60 + minutes;
    if total > MAX_MINUTE {
        return Err(ValidationError::MinuteOutOfRange {
            minute: total,
            max: MAX_MINUTE,
        });
    }
    Ok(total)
}

/// Format minutes as `HH:MM`, wrapping past midnight.
pub fn format_minute(minute: Minute) -> String {
    let wrapped = minute.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Employee identifier as supplied by the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// ISO week key, `YYYY-Www` (e.g. `2026-W42`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(|_| Self { year, week })
            .ok_or_else(|| ValidationError::InvalidWeekKey(format!("{year}-W{week:02}")))
    }

    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        use chrono::Datelike;
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Calendar date of `day` within this week.
    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        // Construction already proved the week exists.
        NaiveDate::from_isoywd_opt(self.year, self.week, day).unwrap_or_default()
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidWeekKey(s.to_string());
        let (year, week) = s.trim().split_once("-W").ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        Self::new(year, week).map_err(|_| invalid())
    }
}

impl TryFrom<String> for WeekKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

/// `0 = Monday .. 6 = Sunday`, the storage encoding of a grid column.
pub fn day_index(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

pub fn day_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Accepts `mon`, `Monday`, or a column index `0..=6`.
pub fn parse_day(s: &str) -> Result<Weekday, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field: "day".into(),
        message: format!("unknown day '{s}'"),
    };
    if let Ok(index) = s.trim().parse::<u8>() {
        return day_from_index(index).ok_or_else(invalid);
    }
    s.trim().parse::<Weekday>().map_err(|_| invalid())
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}
