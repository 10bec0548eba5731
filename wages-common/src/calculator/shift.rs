//! Work shifts located in time

use super::interval::{LocalTimeInterval, ZonedInterval};
use crate::model::ShiftDetails;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use std::cmp::Ordering;

/// A shift placed on the time line of the calculator's time zone
#[derive(Debug, Clone)]
pub struct WorkShift {
    pub person_id: String,
    pub person_name: String,
    pub date: NaiveDate,
    interval: ZonedInterval,
}

impl WorkShift {
    pub fn new(details: ShiftDetails, time_zone: Tz) -> Self {
        let interval = LocalTimeInterval::new(details.begin, details.end).locate(details.date, time_zone);
        Self {
            person_id: details.person_id,
            person_name: details.person_name,
            date: details.date,
            interval,
        }
    }

    /// Time this shift spends in a daily period.
    ///
    /// The period is placed on the shift's date and on the following day, so
    /// the part of a shift running past midnight is counted as well.
    pub fn overlap(&self, period: &LocalTimeInterval) -> Duration {
        let time_zone = self.start().timezone();
        let mut total = self.interval.overlap(&period.locate(self.date, time_zone));
        if let Some(next_day) = self.date.succ_opt() {
            total = total + self.interval.overlap(&period.locate(next_day, time_zone));
        }
        total
    }

    /// First day of the month in which this shift took place
    pub fn month(&self) -> NaiveDate {
        self.date.with_day(1).unwrap_or(self.date)
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.interval.begin
    }

    /// Orders by month, person name, person ID, date and start
    pub fn ordering(&self, that: &WorkShift) -> Ordering {
        (self.date.year(), self.date.month())
            .cmp(&(that.date.year(), that.date.month()))
            .then_with(|| self.person_name.cmp(&that.person_name))
            .then_with(|| self.person_id.cmp(&that.person_id))
            .then_with(|| self.date.cmp(&that.date))
            .then_with(|| self.start().cmp(&that.start()))
    }
}
