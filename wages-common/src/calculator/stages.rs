//! Daily stages of the salary pipeline
//!
//! The regular rates stage splits a person's daily shifts over the regular rate
//! periods. The overtime stage turns those per-period minutes into the day's pay,
//! raising the hourly rate as the day's running total crosses overtime thresholds.

use super::shift::WorkShift;
use crate::settings::{CalculatorSettings, OvertimePercent, RegularRatePeriod};

/// Minutes of one day's shifts that fall into one regular rate period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSegment {
    period: RegularRatePeriod,
    minutes: i64,
}

impl ShiftSegment {
    pub fn new(period: RegularRatePeriod) -> Self {
        Self { period, minutes: 0 }
    }

    /// Adds the minutes of the shift that overlap this segment's period
    pub fn accept(&mut self, shift: &WorkShift) {
        self.minutes += shift.overlap(&self.period.interval).num_minutes();
    }

    pub fn reset(&mut self) {
        self.minutes = 0;
    }

    pub fn rate_by_100(&self) -> i64 {
        self.period.rate_by_100
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }
}

/// Accumulates one day's shifts per regular rate period
#[derive(Debug)]
pub struct RegularRatesStage {
    segments: Vec<ShiftSegment>,
    dirty: bool,
}

impl RegularRatesStage {
    pub fn new(settings: &CalculatorSettings) -> Self {
        debug_assert!(!settings.regular_rates.is_empty());
        Self {
            segments: settings.regular_rates.iter().copied().map(ShiftSegment::new).collect(),
            dirty: false,
        }
    }

    pub fn accept(&mut self, shift: &WorkShift) {
        for segment in &mut self.segments {
            segment.accept(shift);
        }
        self.dirty = true;
    }

    /// Ends the day: returns the accumulated segments, if any shift was seen, and resets
    pub fn flush(&mut self) -> Option<Vec<ShiftSegment>> {
        if !self.dirty {
            return None;
        }
        let day = self.segments.clone();
        self.segments.iter_mut().for_each(ShiftSegment::reset);
        self.dirty = false;
        Some(day)
    }
}

/// Computes the pay for one day's segments
#[derive(Debug)]
pub struct OvertimeRatesStage {
    base_rate_by_100: i64,
    overtime_levels: Vec<OvertimePercent>,
}

impl OvertimeRatesStage {
    pub fn new(settings: &CalculatorSettings) -> Self {
        Self {
            base_rate_by_100: settings.base_rate_by_100,
            overtime_levels: settings.overtime_levels.clone(),
        }
    }

    /// The day's pay in cents for segments given in period order
    pub fn day_amount(&self, segments: &[ShiftSegment]) -> i64 {
        let mut levels = self.overtime_levels.iter();
        // Next threshold to cross; None once all levels are in effect
        let mut next_level = levels.next();
        let mut overtime_percent = 0;
        let mut total_minutes = 0;
        // Running sum in cents per hour times minutes
        let mut salary_by_6000 = 0;

        for segment in segments {
            let mut payable_minutes = segment.minutes();
            total_minutes += payable_minutes;

            while payable_minutes > 0 {
                let excess_minutes = next_level
                    .map(|level| (total_minutes - level.threshold_minutes).max(0))
                    .unwrap_or(0);
                let paid_minutes = (payable_minutes - excess_minutes).max(0);

                let hourly_rate = self.base_rate_by_100
                    + segment.rate_by_100()
                    + percent_of(self.base_rate_by_100, overtime_percent);
                salary_by_6000 += paid_minutes * hourly_rate;
                payable_minutes -= paid_minutes;

                if excess_minutes > 0 {
                    if let Some(level) = next_level {
                        overtime_percent = level.percent;
                    }
                    next_level = levels.next();
                }
            }
        }

        rounded_div(salary_by_6000, 60)
    }
}

fn percent_of(amount: i64, percent: i64) -> i64 {
    rounded_div(amount * percent, 100)
}

/// Division rounding halves up, for non-negative dividends
fn rounded_div(dividend: i64, divisor: i64) -> i64 {
    (dividend + divisor / 2) / divisor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use chrono_tz::Europe::Helsinki;

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn segment(rate: i64, minutes: i64) -> ShiftSegment {
        ShiftSegment {
            period: RegularRatePeriod::new(rate, time(0), time(0)),
            minutes,
        }
    }

    fn stage(base: i64, levels: Vec<OvertimePercent>) -> OvertimeRatesStage {
        OvertimeRatesStage {
            base_rate_by_100: base,
            overtime_levels: levels,
        }
    }

    #[test]
    fn test_regular_minutes_only() {
        let stage = stage(100, vec![]);
        assert_eq!(stage.day_amount(&[segment(0, 60)]), 100);
        assert_eq!(stage.day_amount(&[segment(50, 90)]), 225);
    }

    #[test]
    fn test_empty_day_pays_nothing() {
        let stage = stage(100, vec![OvertimePercent::new(50, 1, 0)]);
        assert_eq!(stage.day_amount(&[]), 0);
        assert_eq!(stage.day_amount(&[segment(10, 0)]), 0);
    }

    #[test]
    fn test_one_segment_crosses_two_levels() {
        // 4 h regular, 2 h at +50%, 1 h at +100%
        let stage = stage(100, vec![OvertimePercent::new(50, 4, 0), OvertimePercent::new(100, 6, 0)]);
        assert_eq!(stage.day_amount(&[segment(0, 7 * 60)]), 400 + 2 * 150 + 200);
    }

    #[test]
    fn test_overtime_carries_across_segments() {
        // 3 h at +0 and 3 h at +20 cents; overtime +50% from 4 h
        let stage = stage(100, vec![OvertimePercent::new(50, 4, 0)]);
        let amount = stage.day_amount(&[segment(0, 180), segment(20, 180)]);
        assert_eq!(amount, 300 + 120 + 2 * 170);
    }

    #[test]
    fn test_overtime_percent_rounds_half_up() {
        // 375 * 25% = 93.75 -> 94 cents
        let stage = stage(375, vec![OvertimePercent::new(25, 0, 30)]);
        let amount = stage.day_amount(&[segment(0, 90)]);
        // (30 * 375 + 60 * 469) / 60 = 656.5 -> 657
        assert_eq!(amount, 657);
    }

    #[test]
    fn test_regular_stage_flush_resets() {
        let settings = CalculatorSettings::new(
            Helsinki,
            100,
            vec![
                RegularRatePeriod::new(0, time(0), time(12)),
                RegularRatePeriod::new(50, time(12), time(0)),
            ],
            vec![],
        );
        let mut regular = RegularRatesStage::new(&settings);
        assert!(regular.flush().is_none());

        let shift = WorkShift::new(
            crate::model::ShiftDetails::new(
                "1",
                "Scott Scala",
                chrono::NaiveDate::from_ymd_opt(2014, 3, 3).unwrap(),
                time(10),
                time(14),
            ),
            Helsinki,
        );
        regular.accept(&shift);
        let day = regular.flush().unwrap();
        assert_eq!(day.iter().map(ShiftSegment::minutes).collect::<Vec<_>>(), vec![120, 120]);
        assert!(regular.flush().is_none());
    }
}
