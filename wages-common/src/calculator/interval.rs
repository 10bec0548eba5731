//! Time-of-day intervals and their DST-aware placement on a calendar date

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;

/// A time-of-day interval; an end at or before the beginning lies on the next day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTimeInterval {
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

impl LocalTimeInterval {
    pub fn new(begin: NaiveTime, end: NaiveTime) -> Self {
        Self { begin, end }
    }

    /// Whether the interval runs past midnight
    pub fn wraps(&self) -> bool {
        self.end <= self.begin
    }

    /// Places this interval on the given date in the given time zone
    pub fn locate(&self, date: NaiveDate, time_zone: Tz) -> ZonedInterval {
        let end_date = if self.wraps() {
            date.succ_opt().unwrap_or(date)
        } else {
            date
        };

        ZonedInterval {
            begin: resolve_local(time_zone, date.and_time(self.begin)),
            end: resolve_local(time_zone, end_date.and_time(self.end)),
        }
    }

    /// Length of the overlap between two intervals placed on the same date
    pub fn overlap(&self, that: &LocalTimeInterval, date: NaiveDate, time_zone: Tz) -> Duration {
        self.locate(date, time_zone)
            .overlap(&that.locate(date, time_zone))
    }
}

/// An interval between two instants, keeping the zone they were resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedInterval {
    pub begin: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl ZonedInterval {
    /// Length of the overlap between two intervals, zero if they are disjoint.
    ///
    /// Where an end point of the overlap falls into the repeated hour of a DST
    /// fall-back, it is taken with the later offset.
    pub fn overlap(&self, that: &ZonedInterval) -> Duration {
        if self.begin < that.end && that.begin < self.end {
            let begin = with_later_offset(self.begin.max(that.begin));
            let end = with_later_offset(self.end.min(that.end));
            end.signed_duration_since(begin).max(Duration::zero())
        } else {
            Duration::zero()
        }
    }

    pub fn length(&self) -> Duration {
        self.end.signed_duration_since(self.begin)
    }
}

/// Resolves a wall-clock time in a zone.
///
/// Ambiguous times take the earlier offset. Times inside a DST gap keep the
/// offset in force before the gap, which moves them later by the gap length.
pub fn resolve_local(time_zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match time_zone.from_local_datetime(&local) {
        LocalResult::Single(resolved) => resolved,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            let before = time_zone
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            let utc = local - Duration::seconds(i64::from(before.local_minus_utc()));
            time_zone.from_utc_datetime(&utc)
        }
    }
}

fn with_later_offset(instant: DateTime<Tz>) -> DateTime<Tz> {
    match instant.timezone().from_local_datetime(&instant.naive_local()) {
        LocalResult::Ambiguous(_, later) => later,
        _ => instant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Helsinki;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_overlap_within_day() {
        let shift = LocalTimeInterval::new(time(8, 0), time(16, 0));
        let period = LocalTimeInterval::new(time(6, 0), time(12, 30));
        let overlap = shift.overlap(&period, date(2014, 3, 3), Helsinki);
        assert_eq!(overlap.num_minutes(), 4 * 60 + 30);
    }

    #[test]
    fn test_disjoint_intervals_do_not_overlap() {
        let shift = LocalTimeInterval::new(time(8, 0), time(10, 0));
        let period = LocalTimeInterval::new(time(10, 0), time(12, 0));
        assert_eq!(shift.overlap(&period, date(2014, 3, 3), Helsinki), Duration::zero());
    }

    #[test]
    fn test_wrapping_interval_ends_next_day() {
        let shift = LocalTimeInterval::new(time(22, 0), time(2, 0));
        assert!(shift.wraps());
        let located = shift.locate(date(2014, 3, 3), Helsinki);
        assert_eq!(located.end.date_naive(), date(2014, 3, 4));
        assert_eq!(located.length().num_hours(), 4);

        let evening = LocalTimeInterval::new(time(18, 0), time(0, 0));
        assert_eq!(shift.overlap(&evening, date(2014, 3, 3), Helsinki).num_hours(), 2);
    }

    #[test]
    fn test_whole_day_interval() {
        let day = LocalTimeInterval::new(time(0, 0), time(0, 0));
        let located = day.locate(date(2014, 3, 3), Helsinki);
        assert_eq!(located.length().num_hours(), 24);
    }

    #[test]
    fn test_spring_forward_day_is_shorter() {
        // Helsinki moves from 03:00 to 04:00 on 30 March 2014
        let day = LocalTimeInterval::new(time(0, 0), time(0, 0));
        assert_eq!(day.locate(date(2014, 3, 30), Helsinki).length().num_hours(), 23);

        let shift = LocalTimeInterval::new(time(2, 0), time(6, 0));
        assert_eq!(shift.overlap(&day, date(2014, 3, 30), Helsinki).num_hours(), 3);
    }

    #[test]
    fn test_time_in_gap_moves_later() {
        let resolved = resolve_local(Helsinki, date(2014, 3, 30).and_time(time(3, 30)));
        assert_eq!(resolved.naive_local().time(), time(4, 30));
    }

    #[test]
    fn test_fall_back_day_is_longer() {
        // Helsinki moves from 04:00 back to 03:00 on 26 October 2014
        let day = LocalTimeInterval::new(time(0, 0), time(0, 0));
        assert_eq!(day.locate(date(2014, 10, 26), Helsinki).length().num_hours(), 25);

        let shift = LocalTimeInterval::new(time(2, 0), time(6, 0));
        assert_eq!(shift.overlap(&day, date(2014, 10, 26), Helsinki).num_hours(), 5);
    }
}
