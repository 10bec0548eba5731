//! Salary calculation pipeline
//!
//! Shifts are buffered as they arrive, then on `flush()` sorted by month, person
//! and time, and fed through the daily stages:
//!
//! ```text
//! WorkShift ─▶ RegularRatesStage ─(per day)─▶ OvertimeRatesStage ─▶ PersonMonth ─▶ sink
//! ```
//!
//! One `SalaryDetails` is emitted per person and month, in month order, then by
//! person name and ID.

pub mod interval;
pub mod shift;
pub mod stages;

use crate::model::{SalaryDetails, ShiftDetails};
use crate::settings::CalculatorSettings;
use chrono::NaiveDate;
use shift::WorkShift;
use stages::{OvertimeRatesStage, RegularRatesStage};
use std::sync::Arc;
use tracing::debug;

/// Computes monthly salaries from work shifts, handing results to a sink
pub struct SalaryCalculator<S>
where
    S: FnMut(SalaryDetails),
{
    settings: Arc<CalculatorSettings>,
    regular: RegularRatesStage,
    overtime: OvertimeRatesStage,
    shifts: Vec<WorkShift>,
    sink: S,
}

impl<S> SalaryCalculator<S>
where
    S: FnMut(SalaryDetails),
{
    pub fn new(settings: Arc<CalculatorSettings>, sink: S) -> Self {
        Self {
            regular: RegularRatesStage::new(&settings),
            overtime: OvertimeRatesStage::new(&settings),
            settings,
            shifts: Vec::new(),
            sink,
        }
    }

    pub fn accept(&mut self, details: ShiftDetails) {
        self.shifts.push(WorkShift::new(details, self.settings.time_zone));
    }

    /// Computes and emits the salaries for all shifts accepted since the last flush
    pub fn flush(&mut self) {
        let mut shifts = std::mem::take(&mut self.shifts);
        if shifts.is_empty() {
            return;
        }
        // Stable: repeated identical shifts are all paid
        shifts.sort_by(WorkShift::ordering);
        debug!("Calculating salaries for {} shifts", shifts.len());

        let mut person: Option<PersonMonth> = None;
        let mut day: Option<NaiveDate> = None;

        for shift in &shifts {
            let at_person_boundary = person.as_ref().map_or(true, |p| !p.matches(shift));
            let at_day_boundary = at_person_boundary || day != Some(shift.date);

            // The day closes first so its pay goes to the person who worked it
            if at_day_boundary {
                self.close_day(person.as_mut());
                day = Some(shift.date);
            }

            if at_person_boundary {
                if let Some(done) = person.take() {
                    (self.sink)(done.salary());
                }
                person = Some(PersonMonth::new(shift));
            }

            self.regular.accept(shift);
        }

        self.close_day(person.as_mut());
        if let Some(done) = person {
            (self.sink)(done.salary());
        }
    }

    /// Flushes pending shifts and hands back the sink
    pub fn finish(mut self) -> S {
        self.flush();
        self.sink
    }

    fn close_day(&mut self, person: Option<&mut PersonMonth>) {
        if let Some(segments) = self.regular.flush() {
            let amount = self.overtime.day_amount(&segments);
            if let Some(person) = person {
                person.salary_by_100 += amount;
            }
        }
    }
}

/// The person and month whose shifts are being summed
struct PersonMonth {
    person_id: String,
    person_name: String,
    month: NaiveDate,
    salary_by_100: i64,
}

impl PersonMonth {
    fn new(shift: &WorkShift) -> Self {
        Self {
            person_id: shift.person_id.clone(),
            person_name: shift.person_name.clone(),
            month: shift.month(),
            salary_by_100: 0,
        }
    }

    fn matches(&self, shift: &WorkShift) -> bool {
        self.person_id == shift.person_id && self.month == shift.month()
    }

    fn salary(self) -> SalaryDetails {
        SalaryDetails {
            person_id: self.person_id,
            person_name: self.person_name,
            month: self.month,
            amount_by_100: self.salary_by_100,
        }
    }
}

/// Runs a batch of shifts through a fresh calculator and collects the salaries
pub fn calculate(
    settings: Arc<CalculatorSettings>,
    shifts: impl IntoIterator<Item = ShiftDetails>,
) -> Vec<SalaryDetails> {
    let mut salaries = Vec::new();
    let mut calculator = SalaryCalculator::new(settings, |details| salaries.push(details));
    for shift in shifts {
        calculator.accept(shift);
    }
    calculator.finish();
    salaries
}
