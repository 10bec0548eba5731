//! Grouping of computed salaries by month for display
//!
//! The calculator emits salaries ordered by month, so a new group is opened
//! whenever the month changes. `SalaryReport` is the JSON body returned by
//! `POST /calculate`; `TextReport` is the command line listing.

use crate::model::SalaryDetails;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// One person's salary within a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSalary {
    pub id: String,
    pub name: String,
    /// Formatted dollar amount, e.g. `$123.05`
    pub salary: String,
}

/// All salaries of one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSalaries {
    pub month: u32,
    pub year: i32,
    pub people: Vec<PersonSalary>,
}

/// Result of a calculation: either grouped salaries or an error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub months: Vec<MonthSalaries>,
}

impl SalaryReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            months: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Builds a `SalaryReport` from salaries in calculator order
#[derive(Debug, Default)]
pub struct ReportBuilder {
    current: Option<NaiveDate>,
    report: SalaryReport,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, details: SalaryDetails) {
        if self.current != Some(details.month) {
            self.current = Some(details.month);
            self.report.months.push(MonthSalaries {
                month: details.month.month(),
                year: details.month.year(),
                people: Vec::new(),
            });
        }

        let salary = details.amount();
        if let Some(group) = self.report.months.last_mut() {
            group.people.push(PersonSalary {
                id: details.person_id,
                name: details.person_name,
                salary,
            });
        }
    }

    pub fn build(self) -> SalaryReport {
        self.report
    }
}

/// Writes salaries as text under a header per month
pub struct TextReport<W: Write> {
    out: W,
    current: Option<NaiveDate>,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out, current: None }
    }

    pub fn add(&mut self, details: &SalaryDetails) -> io::Result<()> {
        if self.current != Some(details.month) {
            self.current = Some(details.month);
            writeln!(
                self.out,
                "Salaries for {}/{}:",
                details.month.month(),
                details.month.year()
            )?;
        }
        writeln!(
            self.out,
            " {}, {}, {}",
            details.person_id,
            details.person_name,
            details.amount()
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(id: &str, name: &str, year: i32, month: u32, amount: i64) -> SalaryDetails {
        SalaryDetails {
            person_id: id.to_string(),
            person_name: name.to_string(),
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            amount_by_100: amount,
        }
    }

    #[test]
    fn test_groups_by_month() {
        let mut builder = ReportBuilder::new();
        builder.add(salary("1", "Janet Java", 2014, 3, 4730));
        builder.add(salary("2", "Scott Scala", 2014, 3, 5064));
        builder.add(salary("2", "Scott Scala", 2014, 4, 105));
        let report = builder.build();

        assert!(!report.is_error());
        assert_eq!(report.months.len(), 2);
        assert_eq!(report.months[0].month, 3);
        assert_eq!(report.months[0].year, 2014);
        assert_eq!(report.months[0].people.len(), 2);
        assert_eq!(report.months[1].people[0].salary, "$1.05");
    }

    #[test]
    fn test_json_shape() {
        let mut builder = ReportBuilder::new();
        builder.add(salary("1", "Janet Java", 2014, 3, 4730));
        let json = serde_json::to_value(builder.build()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "months": [
                    { "month": 3, "year": 2014, "people": [
                        { "id": "1", "name": "Janet Java", "salary": "$47.30" }
                    ] }
                ]
            })
        );

        let failed = serde_json::to_value(SalaryReport::failed("bad input")).unwrap();
        assert_eq!(failed, serde_json::json!({ "error": "bad input", "months": [] }));
    }

    #[test]
    fn test_empty_report() {
        let report = ReportBuilder::new().build();
        assert!(report.months.is_empty());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_text_report() {
        let mut text = TextReport::new(Vec::new());
        text.add(&salary("1", "Janet Java", 2014, 3, 4730)).unwrap();
        text.add(&salary("2", "Scott Scala", 2014, 3, 5064)).unwrap();
        text.add(&salary("2", "Scott Scala", 2014, 4, 100)).unwrap();
        let output = String::from_utf8(text.into_inner()).unwrap();
        assert_eq!(
            output,
            "Salaries for 3/2014:\n 1, Janet Java, $47.30\n 2, Scott Scala, $50.64\nSalaries for 4/2014:\n 2, Scott Scala, $1.00\n"
        );
    }
}
