//! Reference data consumed by the grid: employee roster and holidays.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::slot::EmployeeId;

/// An employee as shown on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// CSS-style color for the employee's slots.
    #[serde(default = "default_color")]
    pub color: String,
    /// Short marker drawn inside narrow slots.
    #[serde(default)]
    pub initial: String,
}

fn default_color() -> String {
    "#3b82f6".into()
}

fn initial_of(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}

impl Employee {
    pub fn new(id: impl Into<EmployeeId>, name: impl Into<String>) -> Self {
        let name = name.into();
        let initial = initial_of(&name);
        Self {
            id: id.into(),
            name,
            color: default_color(),
            initial,
        }
    }
}

/// Ordered list of employees. Missing initials are derived from the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        let employees = employees
            .into_iter()
            .map(|mut e| {
                if e.initial.is_empty() {
                    e.initial = initial_of(&e.name);
                }
                e
            })
            .collect();
        Self { employees }
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

/// Source of advisory holiday labels.
pub trait HolidayCalendar {
    fn label_for(&self, date: NaiveDate) -> Option<String>;
}

/// One configured holiday. `recurring` repeats on the same month and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub label: String,
    #[serde(default)]
    pub recurring: bool,
}

/// Holidays held in memory (loaded from config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayList {
    holidays: Vec<Holiday>,
}

impl HolidayList {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter()
    }
}

impl HolidayCalendar for HolidayList {
    fn label_for(&self, date: NaiveDate) -> Option<String> {
        self.holidays
            .iter()
            .find(|h| {
                h.date == date
                    || (h.recurring && h.date.month() == date.month() && h.date.day() == date.day())
            })
            .map(|h| h.label.clone())
    }
}
