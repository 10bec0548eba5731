//! Calculator settings: time zone, base rate, regular rates and overtime levels
//!
//! `CalculatorConfig` is the raw form read from the `[calculator]` TOML section.
//! `CalculatorSettings` is the validated form the pipeline works with, where the
//! regular rates have been turned into periods that together cover the whole day.

use crate::calculator::interval::LocalTimeInterval;
use crate::{Error, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An additional hourly rate applying from a time of day until the next rate starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularRate {
    pub from_hour: u32,
    #[serde(default)]
    pub from_minute: u32,
    /// Hourly amount in cents added to the base rate
    pub rate_by_100: i64,
}

/// An overtime level: past the threshold, the base rate is raised by `percent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLevel {
    pub threshold_hours: u32,
    #[serde(default)]
    pub threshold_minutes: u32,
    pub percent: i64,
}

/// Calculator section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// IANA time zone in which shift dates and times are interpreted
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Base hourly rate in cents
    #[serde(default = "default_base_rate")]
    pub base_rate_by_100: i64,

    #[serde(default = "default_regular_rates")]
    pub regular_rates: Vec<RegularRate>,

    #[serde(default = "default_overtime_levels")]
    pub overtime_levels: Vec<OvertimeLevel>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            base_rate_by_100: default_base_rate(),
            regular_rates: default_regular_rates(),
            overtime_levels: default_overtime_levels(),
        }
    }
}

fn default_time_zone() -> String {
    "Europe/Helsinki".to_string()
}

fn default_base_rate() -> i64 {
    375
}

fn default_regular_rates() -> Vec<RegularRate> {
    vec![
        RegularRate { from_hour: 6, from_minute: 0, rate_by_100: 0 },
        RegularRate { from_hour: 18, from_minute: 0, rate_by_100: 115 },
    ]
}

fn default_overtime_levels() -> Vec<OvertimeLevel> {
    vec![
        OvertimeLevel { threshold_hours: 8, threshold_minutes: 0, percent: 25 },
        OvertimeLevel { threshold_hours: 10, threshold_minutes: 0, percent: 50 },
        OvertimeLevel { threshold_hours: 12, threshold_minutes: 0, percent: 100 },
    ]
}

/// A regular rate bound to the daily interval in which it applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularRatePeriod {
    pub rate_by_100: i64,
    pub interval: LocalTimeInterval,
}

impl RegularRatePeriod {
    pub fn new(rate_by_100: i64, begin: NaiveTime, end: NaiveTime) -> Self {
        Self {
            rate_by_100,
            interval: LocalTimeInterval::new(begin, end),
        }
    }
}

/// An overtime percent with its threshold flattened to minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimePercent {
    pub percent: i64,
    pub threshold_minutes: i64,
}

impl OvertimePercent {
    pub fn new(percent: i64, threshold_hours: u32, threshold_minutes: u32) -> Self {
        Self {
            percent,
            threshold_minutes: i64::from(threshold_hours) * 60 + i64::from(threshold_minutes),
        }
    }
}

/// Validated, immutable calculator settings
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSettings {
    pub time_zone: Tz,
    pub base_rate_by_100: i64,
    /// Periods starting at midnight, in order, covering the whole day
    pub regular_rates: Vec<RegularRatePeriod>,
    /// Overtime levels by increasing threshold; possibly empty
    pub overtime_levels: Vec<OvertimePercent>,
}

impl CalculatorSettings {
    /// Validate a configuration section and normalize its regular rates
    pub fn from_config(config: &CalculatorConfig) -> Result<Self> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|_| Error::Config(format!("unknown time zone: {}", config.time_zone)))?;

        if config.base_rate_by_100 <= 0 {
            return Err(Error::Config(format!(
                "base rate must be positive: {}",
                config.base_rate_by_100
            )));
        }

        Ok(Self {
            time_zone,
            base_rate_by_100: config.base_rate_by_100,
            regular_rates: regular_rate_periods(&config.regular_rates)?,
            overtime_levels: overtime_percents(&config.overtime_levels)?,
        })
    }

    /// Build settings directly from already normalized parts
    pub fn new(
        time_zone: Tz,
        base_rate_by_100: i64,
        regular_rates: Vec<RegularRatePeriod>,
        overtime_levels: Vec<OvertimePercent>,
    ) -> Self {
        Self {
            time_zone,
            base_rate_by_100,
            regular_rates,
            overtime_levels,
        }
    }
}

fn from_time(rate: &RegularRate) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(rate.from_hour, rate.from_minute, 0).ok_or_else(|| {
        Error::Config(format!(
            "invalid regular rate start time: {}:{:02}",
            rate.from_hour, rate.from_minute
        ))
    })
}

fn regular_rate_periods(rates: &[RegularRate]) -> Result<Vec<RegularRatePeriod>> {
    let (first, last) = match (rates.first(), rates.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::Config("No regular rates specified".to_string())),
    };

    let mut starts: Vec<(NaiveTime, i64)> = Vec::with_capacity(rates.len() + 1);
    for rate in rates {
        let begin = from_time(rate)?;
        // Pay is rounded half-up, which holds only for non-negative amounts
        if rate.rate_by_100 < 0 {
            return Err(Error::Config(format!(
                "regular rate from {} must not be negative: {}",
                begin.format("%H:%M"),
                rate.rate_by_100
            )));
        }
        if let Some((previous, _)) = starts.last() {
            if begin <= *previous {
                return Err(Error::Config(format!(
                    "regular rates must start in increasing order: {} follows {}",
                    begin.format("%H:%M"),
                    previous.format("%H:%M")
                )));
            }
        }
        starts.push((begin, rate.rate_by_100));
    }

    // The first period must start at midnight; the rate running across midnight is the last one
    if first.from_hour + first.from_minute > 0 {
        let midnight = (NaiveTime::MIN, last.rate_by_100);
        if starts.len() == 1 {
            starts[0] = midnight;
        } else {
            starts.insert(0, midnight);
        }
    }

    let periods = starts
        .iter()
        .enumerate()
        .map(|(i, &(begin, rate))| {
            let end = starts.get(i + 1).map(|&(next, _)| next).unwrap_or(NaiveTime::MIN);
            RegularRatePeriod::new(rate, begin, end)
        })
        .collect();

    Ok(periods)
}

fn overtime_percents(levels: &[OvertimeLevel]) -> Result<Vec<OvertimePercent>> {
    let mut percents: Vec<OvertimePercent> = Vec::with_capacity(levels.len());
    for level in levels {
        if level.threshold_minutes >= 60 {
            return Err(Error::Config(format!(
                "overtime threshold minutes out of range: {}",
                level.threshold_minutes
            )));
        }
        if level.percent <= 0 {
            return Err(Error::Config(format!(
                "overtime percent must be positive: {}",
                level.percent
            )));
        }
        let percent = OvertimePercent::new(level.percent, level.threshold_hours, level.threshold_minutes);
        if let Some(previous) = percents.last() {
            if percent.threshold_minutes <= previous.threshold_minutes {
                return Err(Error::Config(format!(
                    "overtime thresholds must increase: {}h{:02}m",
                    level.threshold_hours, level.threshold_minutes
                )));
            }
        }
        percents.push(percent);
    }
    Ok(percents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn config(rates: Vec<RegularRate>) -> CalculatorConfig {
        CalculatorConfig {
            regular_rates: rates,
            ..CalculatorConfig::default()
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = CalculatorSettings::from_config(&CalculatorConfig::default()).unwrap();
        assert_eq!(settings.time_zone, chrono_tz::Europe::Helsinki);
        assert_eq!(settings.base_rate_by_100, 375);
        assert_eq!(
            settings.regular_rates,
            vec![
                RegularRatePeriod::new(115, time(0, 0), time(6, 0)),
                RegularRatePeriod::new(0, time(6, 0), time(18, 0)),
                RegularRatePeriod::new(115, time(18, 0), time(0, 0)),
            ]
        );
        assert_eq!(settings.overtime_levels.len(), 3);
        assert_eq!(settings.overtime_levels[0].threshold_minutes, 8 * 60);
        assert_eq!(settings.overtime_levels[2].percent, 100);
    }

    #[test]
    fn test_single_rate_not_at_midnight_covers_whole_day() {
        let settings = CalculatorSettings::from_config(&config(vec![RegularRate {
            from_hour: 9,
            from_minute: 30,
            rate_by_100: 50,
        }]))
        .unwrap();
        assert_eq!(
            settings.regular_rates,
            vec![RegularRatePeriod::new(50, time(0, 0), time(0, 0))]
        );
    }

    #[test]
    fn test_rates_starting_at_midnight_kept_as_is() {
        let settings = CalculatorSettings::from_config(&config(vec![
            RegularRate { from_hour: 0, from_minute: 0, rate_by_100: 10 },
            RegularRate { from_hour: 12, from_minute: 15, rate_by_100: 20 },
        ]))
        .unwrap();
        assert_eq!(
            settings.regular_rates,
            vec![
                RegularRatePeriod::new(10, time(0, 0), time(12, 15)),
                RegularRatePeriod::new(20, time(12, 15), time(0, 0)),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_rates() {
        let err = CalculatorSettings::from_config(&config(vec![])).unwrap_err();
        assert!(err.to_string().contains("No regular rates specified"));
    }

    #[test]
    fn test_rejects_unordered_rates() {
        let err = CalculatorSettings::from_config(&config(vec![
            RegularRate { from_hour: 18, from_minute: 0, rate_by_100: 10 },
            RegularRate { from_hour: 6, from_minute: 0, rate_by_100: 0 },
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_negative_regular_rate() {
        let err = CalculatorSettings::from_config(&config(vec![
            RegularRate { from_hour: 0, from_minute: 0, rate_by_100: 0 },
            RegularRate { from_hour: 22, from_minute: 0, rate_by_100: -25 },
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("regular rate from 22:00 must not be negative: -25"));
    }

    #[test]
    fn test_rejects_invalid_time_and_zone() {
        let bad_time = config(vec![RegularRate { from_hour: 24, from_minute: 0, rate_by_100: 0 }]);
        assert!(CalculatorSettings::from_config(&bad_time).is_err());

        let bad_zone = CalculatorConfig {
            time_zone: "Mars/Olympus".to_string(),
            ..CalculatorConfig::default()
        };
        let err = CalculatorSettings::from_config(&bad_zone).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_rejects_bad_overtime_levels() {
        let decreasing = CalculatorConfig {
            overtime_levels: vec![
                OvertimeLevel { threshold_hours: 10, threshold_minutes: 0, percent: 50 },
                OvertimeLevel { threshold_hours: 8, threshold_minutes: 0, percent: 25 },
            ],
            ..CalculatorConfig::default()
        };
        assert!(CalculatorSettings::from_config(&decreasing).is_err());

        let zero_percent = CalculatorConfig {
            overtime_levels: vec![OvertimeLevel { threshold_hours: 8, threshold_minutes: 0, percent: 0 }],
            ..CalculatorConfig::default()
        };
        assert!(CalculatorSettings::from_config(&zero_percent).is_err());
    }

    #[test]
    fn test_rejects_non_positive_base_rate() {
        let cfg = CalculatorConfig {
            base_rate_by_100: 0,
            ..CalculatorConfig::default()
        };
        assert!(CalculatorSettings::from_config(&cfg).is_err());
    }
}
