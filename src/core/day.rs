use crate::errors::{AppError, AppResult};
use crate::utils::date::{DayRange, display_date};
use chrono::{NaiveDate, TimeZone};

/// The day the session currently counts against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayContext {
    pub date: NaiveDate,
    pub label: String,
    pub range: DayRange,
}

impl DayContext {
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> AppResult<Self> {
        Ok(Self {
            date,
            label: display_date(date),
            range: DayRange::for_date_in(date, tz)?,
        })
    }

    /// Day context containing the instant `now_ms` as seen in `tz`.
    pub fn at<Tz: TimeZone>(tz: &Tz, now_ms: i64) -> AppResult<Self> {
        Self::for_date(local_date(tz, now_ms)?, tz)
    }
}

pub fn local_date<Tz: TimeZone>(tz: &Tz, now_ms: i64) -> AppResult<NaiveDate> {
    tz.timestamp_millis_opt(now_ms)
        .single()
        .map(|dt| dt.date_naive())
        .ok_or_else(|| AppError::InvalidDate(format!("timestamp {} out of range", now_ms)))
}
