//! SQLite-based storage for day schedules.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Utc, Weekday};
use rusqlite::{params, Connection};
use tracing::debug;

use super::data_dir;
use super::migrations;
use super::repository::ScheduleRepository;
use crate::error::StorageError;
use crate::schedule::WeekSchedule;
use crate::slot::{day_from_index, day_index, validate_external, Category, EmployeeId, TimeSlot, WeekKey};

/// Raw `day_slots` row before validation.
type SlotRow = (i32, i32, String, Option<String>);

fn row_to_slot(
    (start, end, category, note): SlotRow,
    employee: &EmployeeId,
    week: &WeekKey,
    day: u8,
) -> Result<TimeSlot, StorageError> {
    let category: Category = category.parse().map_err(|source| StorageError::CorruptRow {
        employee_id: employee.to_string(),
        week: week.to_string(),
        day,
        source,
    })?;
    Ok(TimeSlot {
        start,
        end,
        category,
        note,
    })
}

fn check_day(
    slots: &[TimeSlot],
    employee: &EmployeeId,
    week: &WeekKey,
    day: u8,
) -> Result<(), StorageError> {
    validate_external(slots).map_err(|source| StorageError::CorruptRow {
        employee_id: employee.to_string(),
        week: week.to_string(),
        day,
        source,
    })
}

/// SQLite database for day schedules.
///
/// One row per slot in `day_slots`; a day is always rewritten as a whole.
pub struct ScheduleDb {
    conn: Connection,
}

impl ScheduleDb {
    /// Open the schedule database at `<data_dir>/shiftgrid.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("shiftgrid.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn migrate(&self) -> Result<(), StorageError> {
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    /// Weeks with at least one stored slot, oldest first.
    pub fn list_weeks(&self) -> Result<Vec<WeekKey>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT week FROM day_slots ORDER BY week")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        raw.iter()
            .map(|week| {
                week.parse().map_err(|source| StorageError::CorruptRow {
                    employee_id: String::new(),
                    week: week.clone(),
                    day: 0,
                    source,
                })
            })
            .collect()
    }

    /// Delete every slot of `week`. Returns the number of rows removed.
    pub fn clear_week(&mut self, week: &WeekKey) -> Result<usize, StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM day_slots WHERE week = ?1", params![week.to_string()])?;
        debug!(%week, removed, "week cleared");
        Ok(removed)
    }
}

impl ScheduleRepository for ScheduleDb {
    fn get_day_slots(
        &self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
    ) -> Result<Vec<TimeSlot>, StorageError> {
        let d = day_index(day);
        let mut stmt = self.conn.prepare(
            "SELECT start_min, end_min, category, note FROM day_slots
             WHERE employee_id = ?1 AND week = ?2 AND day = ?3
             ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![employee.as_str(), week.to_string(), d], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<SlotRow>, _>>()?;

        let slots = rows
            .into_iter()
            .map(|row| row_to_slot(row, employee, week, d))
            .collect::<Result<Vec<_>, _>>()?;
        check_day(&slots, employee, week, d)?;
        Ok(slots)
    }

    fn set_day_slots(
        &mut self,
        employee: &EmployeeId,
        week: &WeekKey,
        day: Weekday,
        slots: &[TimeSlot],
    ) -> Result<(), StorageError> {
        let d = day_index(day);
        let week_str = week.to_string();
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM day_slots WHERE employee_id = ?1 AND week = ?2 AND day = ?3",
            params![employee.as_str(), week_str, d],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO day_slots
                    (employee_id, week, day, position, start_min, end_min, category, note, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, slot) in slots.iter().enumerate() {
                insert.execute(params![
                    employee.as_str(),
                    week_str,
                    d,
                    position as i64,
                    slot.start,
                    slot.end,
                    slot.category.as_str(),
                    slot.note,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        debug!(%employee, %week, ?day, slots = slots.len(), "day stored");
        Ok(())
    }

    fn load_week(&self, week: &WeekKey) -> Result<WeekSchedule, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_id, day, start_min, end_min, category, note FROM day_slots
             WHERE week = ?1
             ORDER BY employee_id, day, position",
        )?;
        let rows = stmt
            .query_map(params![week.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u8>(1)?,
                    (row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?),
                ))
            })?
            .collect::<Result<Vec<(String, u8, SlotRow)>, _>>()?;

        let mut days: BTreeMap<(EmployeeId, u8), Vec<TimeSlot>> = BTreeMap::new();
        for (employee, d, row) in rows {
            let employee = EmployeeId::new(employee);
            let slot = row_to_slot(row, &employee, week, d)?;
            days.entry((employee, d)).or_default().push(slot);
        }

        let mut schedule = WeekSchedule::new(week.clone());
        for ((employee, d), slots) in days {
            let Some(day) = day_from_index(d) else {
                return Err(StorageError::CorruptRow {
                    employee_id: employee.to_string(),
                    week: week.to_string(),
                    day: d,
                    source: crate::error::ValidationError::InvalidValue {
                        field: "day".into(),
                        message: format!("day index {d} is not 0..=6"),
                    },
                });
            };
            let employee_id = employee.to_string();
            schedule
                .load_day(employee, day, slots)
                .map_err(|source| StorageError::CorruptRow {
                    employee_id,
                    week: week.to_string(),
                    day: d,
                    source,
                })?;
        }
        Ok(schedule)
    }
}
