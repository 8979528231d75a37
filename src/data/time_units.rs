//! CF-style time units (`"hours since 1970-01-01 00:00:00"`).

use crate::error::{EddyError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

/// Step size of a time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Days => 86_400.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = EddyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" => Ok(TimeUnit::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Ok(TimeUnit::Hours),
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            other => Err(EddyError::InvalidTimeUnits(format!("unknown unit '{}'", other))),
        }
    }
}

/// Parsed `units` attribute of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    /// Step size.
    pub unit: TimeUnit,
    /// Reference datetime (UTC).
    pub epoch: NaiveDateTime,
}

impl TimeUnits {
    /// Convert an axis value to a datetime.
    pub fn to_datetime(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.unit.seconds() * 1_000.0).round();
        if millis.abs() > i64::MAX as f64 {
            return None;
        }
        let delta = TimeDelta::try_milliseconds(millis as i64)?;
        self.epoch.checked_add_signed(delta)
    }

    /// Convert a datetime to an axis value.
    pub fn to_value(&self, datetime: NaiveDateTime) -> f64 {
        let millis = (datetime - self.epoch).num_milliseconds() as f64;
        millis / 1_000.0 / self.unit.seconds()
    }
}

impl FromStr for TimeUnits {
    type Err = EddyError;

    fn from_str(s: &str) -> Result<Self> {
        let (unit, reference) = s
            .split_once(" since ")
            .ok_or_else(|| EddyError::InvalidTimeUnits(format!("expected '<unit> since <date>', got '{}'", s)))?;

        Ok(Self {
            unit: unit.parse()?,
            epoch: parse_datetime(reference)?,
        })
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} since {}", self.unit.name(), self.epoch.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Parse a datetime in RFC 3339 or one of the common CF layouts.
///
/// Zone suffixes `Z`, `UTC` and `GMT` are accepted; explicit offsets are
/// normalized to UTC.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    let bare = s
        .trim_end_matches(" UTC")
        .trim_end_matches(" GMT")
        .trim_end_matches('Z')
        .trim();

    const LAYOUTS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for layout in LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(bare, layout) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(bare, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| EddyError::InvalidTimeUnits(format!("unrecognized datetime '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_hours_since() {
        let units: TimeUnits = "hours since 1950-01-01 00:00:00".parse().unwrap();
        assert_eq!(units.unit, TimeUnit::Hours);
        assert_eq!(units.epoch, dt("1950-01-01 00:00:00"));
    }

    #[test]
    fn parses_date_only_and_zone_suffix() {
        let units: TimeUnits = "days since 2000-01-01".parse().unwrap();
        assert_eq!(units.epoch, dt("2000-01-01 00:00:00"));

        let units: TimeUnits = "seconds since 1970-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(units.unit, TimeUnit::Seconds);
        assert_eq!(units.epoch, dt("1970-01-01 00:00:00"));
    }

    #[test]
    fn rejects_malformed_units() {
        assert!("hours after 1950-01-01".parse::<TimeUnits>().is_err());
        assert!("fortnights since 1950-01-01".parse::<TimeUnits>().is_err());
        assert!("hours since yesterday".parse::<TimeUnits>().is_err());
    }

    #[test]
    fn converts_both_ways() {
        let units: TimeUnits = "hours since 2024-06-01 00:00:00".parse().unwrap();
        assert_eq!(units.to_value(dt("2024-06-01 06:30:00")), 6.5);
        assert_eq!(units.to_datetime(30.0), Some(dt("2024-06-02 06:00:00")));
        assert_eq!(units.to_datetime(f64::NAN), None);
    }

    #[test]
    fn rfc3339_offset_is_normalized() {
        let parsed = parse_datetime("2024-06-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, dt("2024-06-01 00:00:00"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let units: TimeUnits = "min since 2020-02-29 12:00".parse().unwrap();
        assert_eq!(units.to_string(), "minutes since 2020-02-29 12:00:00");
    }
}
