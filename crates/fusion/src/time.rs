//! Report timestamps that stay ordered across midnight.

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};

use crate::error::{Error, Result};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;

/// Milliseconds since 0001-01-01 UTC.
///
/// Reports only carry a time of day; the day is taken from the clock at
/// parse time. A time of day more than one hour ahead of the clock is
/// assumed to belong to the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

/// Time-of-day layouts found in input reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `hhmmss` with an optional `.s+` fraction (APRS, NMEA).
    Hhmmss,
    /// `hh:mm:ss.fff` (SBS).
    HhColonMmColonSs,
}

impl Timestamp {
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn parse(value: &str, format: TimeFormat, now: DateTime<Utc>) -> Result<Self> {
        let time = match format {
            TimeFormat::Hhmmss => parse_compact(value),
            TimeFormat::HhColonMmColonSs => parse_colon(value),
        }
        .ok_or_else(|| Error::InvalidTime(value.to_string()))?;
        Ok(Self::on_day_of(time, now))
    }

    pub fn on_day_of(time: NaiveTime, now: DateTime<Utc>) -> Self {
        let ms = ms_of_day(time);
        let now_ms = ms_of_day(now.time());
        let mut day = i64::from(now.date_naive().num_days_from_ce());
        if ms - now_ms > MS_PER_HOUR {
            day -= 1;
        }
        Self(day * MS_PER_DAY + ms)
    }
}

fn ms_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * 1000 + i64::from(time.nanosecond() / 1_000_000)
}

fn parse_compact(value: &str) -> Option<NaiveTime> {
    let (hms, frac) = value.split_once('.').unwrap_or((value, ""));
    if hms.len() != 6 || !hms.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let field = |i: usize| hms[i..i + 2].parse::<u32>().ok();
    NaiveTime::from_hms_milli_opt(field(0)?, field(2)?, field(4)?, fraction_ms(frac)?)
}

fn parse_colon(value: &str) -> Option<NaiveTime> {
    let mut parts = value.splitn(3, ':');
    let h = parts.next()?.parse::<u32>().ok()?;
    let m = parts.next()?.parse::<u32>().ok()?;
    let seconds = parts.next()?;
    let (s, frac) = seconds.split_once('.').unwrap_or((seconds, ""));
    NaiveTime::from_hms_milli_opt(h, m, s.parse().ok()?, fraction_ms(frac)?)
}

fn fraction_ms(frac: &str) -> Option<u32> {
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = frac.get(..3).unwrap_or(frac);
    if digits.is_empty() {
        return Some(0);
    }
    let value: u32 = digits.parse().ok()?;
    Some(value * 10u32.pow(3 - digits.len() as u32))
}
