//! In-memory week of day schedules, the session's source of truth.

use std::collections::BTreeMap;

use chrono::Weekday;

use crate::error::ValidationError;
use crate::slot::{day_from_index, day_index, validate_external, EmployeeId, TimeSlot, WeekKey};

/// All employees' slots for one ISO week, keyed by `(employee, day)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    week: WeekKey,
    days: BTreeMap<(EmployeeId, u8), Vec<TimeSlot>>,
}

impl WeekSchedule {
    pub fn new(week: WeekKey) -> Self {
        Self {
            week,
            days: BTreeMap::new(),
        }
    }

    pub fn week(&self) -> &WeekKey {
        &self.week
    }

    /// Slots of one employee on one day; empty if none were loaded.
    pub fn day(&self, employee: &EmployeeId, day: Weekday) -> &[TimeSlot] {
        self.days
            .get(&(employee.clone(), day_index(day)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Accept a day coming from outside (repository, file, CLI).
    ///
    /// # Errors
    /// Rejects the whole list if any slot is malformed; the schedule is left
    /// untouched in that case.
    pub fn load_day(
        &mut self,
        employee: EmployeeId,
        day: Weekday,
        slots: Vec<TimeSlot>,
    ) -> Result<(), ValidationError> {
        validate_external(&slots)?;
        self.set_day(employee, day, slots);
        Ok(())
    }

    /// Replace a day with a list produced by the slot algebra.
    pub(crate) fn set_day(&mut self, employee: EmployeeId, day: Weekday, slots: Vec<TimeSlot>) {
        let key = (employee, day_index(day));
        if slots.is_empty() {
            self.days.remove(&key);
        } else {
            self.days.insert(key, slots);
        }
    }

    /// Employees with at least one slot on `day`, in id order.
    pub fn employees_on(&self, day: Weekday) -> impl Iterator<Item = (&EmployeeId, &[TimeSlot])> {
        let wanted = day_index(day);
        self.days
            .iter()
            .filter(move |((_, d), _)| *d == wanted)
            .map(|((employee, _), slots)| (employee, slots.as_slice()))
    }

    /// Every non-empty day, ordered by employee then weekday.
    pub fn iter(&self) -> impl Iterator<Item = (&EmployeeId, Weekday, &[TimeSlot])> {
        self.days.iter().filter_map(|((employee, d), slots)| {
            day_from_index(*d).map(|day| (employee, day, slots.as_slice()))
        })
    }

    pub fn slot_count(&self, day: Weekday) -> usize {
        self.employees_on(day).map(|(_, slots)| slots.len()).sum()
    }
}
