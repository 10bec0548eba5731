//! CSV timesheet parsing
//!
//! The first record of a timesheet is its header. Header cells are mapped to the
//! five shift fields through `CsvFields`, so columns may come in any order.
//! Subsequent records hold one shift each:
//!
//! ```text
//! Person Name,Person ID,Date,Start,End
//! Janet Java,1,3.3.2014,9:30,17:00
//! ```
//!
//! Dates are `day.month.year` and times `hour:minute`, each a plain number.

use crate::calculator::SalaryCalculator;
use crate::model::{SalaryDetails, ShiftDetails};
use crate::settings::CalculatorSettings;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use encoding_rs::{Encoding, UTF_8};
use ::csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

/// The shift fields a timesheet must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Id,
    Name,
    Date,
    Start,
    Stop,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Id,
        FieldName::Name,
        FieldName::Date,
        FieldName::Start,
        FieldName::Stop,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldName::Id => "ID",
            FieldName::Name => "NAME",
            FieldName::Date => "DATE",
            FieldName::Start => "START",
            FieldName::Stop => "STOP",
        };
        f.write_str(name)
    }
}

/// Header names for each shift field (`[csv.fields]` in the configuration file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFields {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_stop")]
    pub stop: String,
}

impl Default for CsvFields {
    fn default() -> Self {
        Self {
            id: default_id(),
            name: default_name(),
            date: default_date(),
            start: default_start(),
            stop: default_stop(),
        }
    }
}

fn default_id() -> String {
    "Person ID".to_string()
}

fn default_name() -> String {
    "Person Name".to_string()
}

fn default_date() -> String {
    "Date".to_string()
}

fn default_start() -> String {
    "Start".to_string()
}

fn default_stop() -> String {
    "End".to_string()
}

impl CsvFields {
    fn header_name(&self, field: FieldName) -> &str {
        match field {
            FieldName::Id => &self.id,
            FieldName::Name => &self.name,
            FieldName::Date => &self.date,
            FieldName::Start => &self.start,
            FieldName::Stop => &self.stop,
        }
    }

    /// Maps upper-cased header names back to fields
    fn lookup(&self) -> HashMap<String, FieldName> {
        FieldName::ALL
            .iter()
            .map(|&field| (self.header_name(field).trim().to_uppercase(), field))
            .collect()
    }

    /// Finds the column of each field in a header record
    fn column_map(&self, header: &StringRecord) -> Result<[usize; 5]> {
        if header.len() != FieldName::ALL.len() {
            let expected: Vec<String> = FieldName::ALL.iter().map(ToString::to_string).collect();
            return Err(Error::InvalidInput(format!(
                "unexpected CSV field count: {} (expecting {}: [{}])",
                header.len(),
                FieldName::ALL.len(),
                expected.join(", ")
            )));
        }

        let lookup = self.lookup();
        let mut columns: [Option<usize>; 5] = [None; 5];
        for (column, name) in header.iter().enumerate() {
            let field = lookup
                .get(&name.to_uppercase())
                .ok_or_else(|| Error::InvalidInput(format!("CSV header '{}' not recognized", name)))?;
            let slot = &mut columns[field.index()];
            if slot.is_some() {
                return Err(Error::InvalidInput(format!(
                    "CSV header '{}' encountered twice",
                    name
                )));
            }
            *slot = Some(column);
        }

        // Five distinct recognized names in five cells fill every slot
        let mut map = [0; 5];
        for (slot, column) in map.iter_mut().zip(columns) {
            *slot = column.ok_or_else(|| Error::InvalidInput("CSV header incomplete".to_string()))?;
        }
        Ok(map)
    }
}

/// Reads shifts from a CSV timesheet, handing each to `consumer`
pub fn parse_shifts<R, F>(reader: R, fields: &CsvFields, mut consumer: F) -> Result<()>
where
    R: Read,
    F: FnMut(ShiftDetails),
{
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut columns: Option<[usize; 5]> = None;
    let mut count = 0usize;

    for result in csv.records() {
        let record = result?;
        // Whitespace-only lines come through trimmed to one empty field
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let map = match columns {
            Some(map) => map,
            None => {
                columns = Some(fields.column_map(&record)?);
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != map.len() {
            return Err(Error::InvalidInput(format!(
                "line {}: expected {} fields, found {}",
                line,
                map.len(),
                record.len()
            )));
        }

        let value = |field: FieldName| record.get(map[field.index()]).unwrap_or("");
        consumer(ShiftDetails {
            person_id: value(FieldName::Id).to_string(),
            person_name: value(FieldName::Name).to_string(),
            date: parse_date(value(FieldName::Date), line)?,
            begin: parse_time(value(FieldName::Start), line)?,
            end: parse_time(value(FieldName::Stop), line)?,
        });
        count += 1;
    }

    debug!("Parsed {} shifts", count);
    Ok(())
}

/// Reads all shifts of a CSV timesheet
pub fn read_shifts<R: Read>(reader: R, fields: &CsvFields) -> Result<Vec<ShiftDetails>> {
    let mut shifts = Vec::new();
    parse_shifts(reader, fields, |shift| shifts.push(shift))?;
    Ok(shifts)
}

/// Computes the salaries in a CSV timesheet.
///
/// The whole timesheet is parsed before any salary reaches `sink`, so a
/// malformed file yields an error and no partial results.
pub fn process<R, S>(
    reader: R,
    settings: Arc<CalculatorSettings>,
    fields: &CsvFields,
    sink: S,
) -> Result<()>
where
    R: Read,
    S: FnMut(SalaryDetails),
{
    let shifts = read_shifts(reader, fields)?;
    let mut calculator = SalaryCalculator::new(settings, sink);
    for shift in shifts {
        calculator.accept(shift);
    }
    calculator.finish();
    Ok(())
}

/// Looks up a character encoding by its WHATWG label, e.g. `latin1` or `UTF-8`
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::Encoding(format!("unknown character encoding: {}", label)))
}

/// Decodes timesheet bytes in the named character encoding (UTF-8 if none)
pub fn decode(bytes: &[u8], charset: Option<&str>) -> Result<String> {
    let encoding = match charset.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => encoding_for_label(label)?,
        None => UTF_8,
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::Encoding(format!("input is not valid {}", used.name())));
    }
    Ok(text.into_owned())
}

fn parse_date(value: &str, line: u64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("line {}: invalid date '{}': {}", line, value, e)))
}

fn parse_time(value: &str, line: u64) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("line {}: invalid time '{}': {}", line, value, e)))
}
