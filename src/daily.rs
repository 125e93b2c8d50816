use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Canonical `YYYY-MM-DD` key for the calendar day `now` falls on in `zone`.
///
/// chrono formats numerals itself, so the key never depends on the system locale.
pub fn today_key<Tz: TimeZone>(now: DateTime<Utc>, zone: &Tz) -> String {
    now.with_timezone(zone)
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Time zone in which "today" is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DayZone {
    pub fn utc() -> Self {
        DayZone::Fixed(Utc.fix())
    }

    pub fn day_key(&self, now: DateTime<Utc>) -> String {
        match self {
            DayZone::Local => today_key(now, &Local),
            DayZone::Fixed(offset) => today_key(now, offset),
        }
    }
}

impl FromStr for DayZone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(DayZone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(DayZone::utc());
        }
        s.parse::<FixedOffset>()
            .map(DayZone::Fixed)
            .map_err(|_| AppError::Config(format!("invalid time zone '{}', expected 'local' or an offset like +05:30", s)))
    }
}

impl TryFrom<String> for DayZone {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayZone> for String {
    fn from(zone: DayZone) -> Self {
        zone.to_string()
    }
}

impl fmt::Display for DayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayZone::Local => f.write_str("local"),
            DayZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}
