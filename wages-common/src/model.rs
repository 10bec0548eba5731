//! Shift and salary types exchanged with the calculator

use chrono::{Datelike, NaiveDate, NaiveTime};
use std::fmt;

/// One work shift of one person, as read from a timesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftDetails {
    pub person_id: String,
    pub person_name: String,
    pub date: NaiveDate,
    pub begin: NaiveTime,
    /// End of the shift; at or before `begin` means the shift ends on the next day
    pub end: NaiveTime,
}

impl ShiftDetails {
    pub fn new(
        person_id: impl Into<String>,
        person_name: impl Into<String>,
        date: NaiveDate,
        begin: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            person_name: person_name.into(),
            date,
            begin,
            end,
        }
    }
}

/// The monthly salary of one person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryDetails {
    pub person_id: String,
    pub person_name: String,
    /// First day of the month the salary is for
    pub month: NaiveDate,
    /// Salary in cents
    pub amount_by_100: i64,
}

impl SalaryDetails {
    /// Returns the formatted dollar amount, e.g. `$123.05`
    pub fn amount(&self) -> String {
        format_amount(self.amount_by_100)
    }
}

impl fmt::Display for SalaryDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}/{}, {}",
            self.person_id,
            self.person_name,
            self.month.month(),
            self.month.year(),
            self.amount()
        )
    }
}

/// Formats an amount of cents as dollars with two-digit cents
pub fn format_amount(amount_by_100: i64) -> String {
    let sign = if amount_by_100 < 0 { "-" } else { "" };
    let abs = amount_by_100.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}
