//! Persistence seam for day schedules.

use std::collections::BTreeMap;

use chrono::Weekday;

use crate::error::StorageError;
use crate::schedule::WeekSchedule;
use crate::slot::{day_index, EmployeeId, TimeSlot, WeekKey};

/// Store of day schedules keyed by `(employee, week, day)`.
///
/// Writes always replace the whole day. Implementations must be `Send` so a
/// [`CommitWriter`](super::CommitWriter) can own them on a worker thread.
pub trait ScheduleRepository: Send {
    fn get_day_slots(
        &self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
    ) -> Result<Vec<TimeSlot>, StorageError>;

    /// Replace the stored day. An empty list removes it.
    fn set_day_slots(
        &mut self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
        slots: &[TimeSlot],
    ) -> Result<(), StorageError>;

    /// Every stored day of `week`, validated on the way in.
    fn load_week(&self, week: &WeekKey) -> Result<WeekSchedule, StorageError>;
}

/// Repository held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    days: BTreeMap<(EmployeeId, WeekKey, u8), Vec<TimeSlot>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl ScheduleRepository for MemoryRepository {
    fn get_day_slots(
        &self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
    ) -> Result<Vec<TimeSlot>, StorageError> {
        Ok(self
            .days
            .get(&(employee.clone(), week.clone(), day_index(day)))
            .cloned()
            .unwrap_or_default())
    }

    fn set_day_slots(
        &mut self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
        slots: &[TimeSlot],
    ) -> Result<(), StorageError> {
        let key = (employee.clone(), week.clone(), day_index(day));
        if slots.is_empty() {
            self.days.remove(&key);
        } else {
            self.days.insert(key, slots.to_vec());
        }
        Ok(())
    }

    fn load_week(&self, week: &WeekKey) -> Result<WeekSchedule, StorageError> {
        let mut schedule = WeekSchedule::new(week.clone());
        for ((employee, stored_week, d), slots) in &self.days {
            if stored_week != week {
                continue;
            }
            let Some(day) = crate::slot::day_from_index(*d) else {
                continue;
            };
            schedule
                .load_day(employee.clone(), day, slots.clone())
                .map_err(|source| StorageError::CorruptRow {
                    employee_id: employee.to_string(),
                    week: week.to_string(),
                    day: *d,
                    source,
                })?;
        }
        Ok(schedule)
    }
}
