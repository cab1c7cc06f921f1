pub mod config;
pub mod employees;
pub mod layout;
pub mod replay;
pub mod slots;
pub mod week;

use chrono::Local;
use shiftgrid_core::{Config, EmployeeId, ValidationError, WeekKey};

/// The requested week, or the week containing today.
pub fn week_or_current(week: Option<WeekKey>) -> WeekKey {
    week.unwrap_or_else(|| WeekKey::containing(Local::now().date_naive()))
}

/// Reject ids missing from a configured roster. An empty roster accepts any id.
pub fn check_employee(config: &Config, employee: &EmployeeId) -> Result<(), ValidationError> {
    if config.employees.is_empty() || config.roster().contains(employee) {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: "employee".into(),
        message: format!("'{employee}' is not in the roster"),
    })
}
