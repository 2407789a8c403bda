use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_millis() -> i64 {
    Local::now().timestamp_millis()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Resolve an optional `--date` argument, defaulting to today.
pub fn date_or_today(s: Option<&String>) -> AppResult<NaiveDate> {
    match s {
        Some(raw) => parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.to_string())),
        None => Ok(today()),
    }
}

/// Noon of `date` in local time, as ms since epoch. Used to anchor a
/// session on a day other than today: noon is valid on every DST day.
pub fn midday_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(12, 0, 0)
        .and_then(|dt| Local.from_local_datetime(&dt).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(now_millis)
}

/// Date shown above the counters, e.g. "October 14".
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Inclusive millisecond interval covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: i64,
    pub end: i64,
}

impl DayRange {
    /// Day range for `date` in the local timezone.
    pub fn for_date(date: NaiveDate) -> AppResult<Self> {
        Self::for_date_in(date, &Local)
    }

    /// Day range for `date` in an arbitrary timezone.
    ///
    /// `end` is always `start + 24h - 1ms`, so on DST transition days the
    /// range is not aligned with the next local midnight.
    pub fn for_date_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> AppResult<Self> {
        let start = start_of_day(date, tz)?.timestamp_millis();
        Ok(Self {
            start,
            end: start + MS_PER_DAY - 1,
        })
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        (self.start..=self.end).contains(&timestamp)
    }
}

/// First instant of `date` in `tz`.
///
/// An ambiguous midnight resolves to the earliest candidate; a midnight
/// skipped by a DST jump resolves to the first valid local hour of the day.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> AppResult<DateTime<Tz>> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);

    for hour in 0..24 {
        let candidate = midnight + Duration::hours(hour);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return Ok(dt);
        }
    }

    Err(AppError::InvalidDate(format!(
        "{} has no representable local start of day",
        date
    )))
}
