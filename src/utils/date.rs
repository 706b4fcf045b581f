use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Day names (`thursday`, `Thu`) or an index 0-6 where 0 is Monday.
pub fn parse_weekday(s: &str) -> AppResult<Weekday> {
    let t = s.trim();
    if let Ok(idx) = t.parse::<u8>() {
        return Weekday::try_from(idx).map_err(|_| AppError::InvalidWeekday(s.to_string()));
    }
    t.parse::<Weekday>()
        .map_err(|_| AppError::InvalidWeekday(s.to_string()))
}

pub fn parse_timezone(s: &str) -> AppResult<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidTimezone(s.to_string()))
}
