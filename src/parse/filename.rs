//! Game date from snapshot filenames (`MM-DD-YYYY-seq.html`).

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{parse_leading_int, ParseError};

/// Snapshots are saved in the evening, US time; the offset keeps the
/// calendar date stable when rendered in UTC.
pub const DATE_OFFSET_HOURS: i64 = 6;

/// Calendar date encoded in the first three hyphen-separated parts.
pub fn file_date(file_name: &str) -> Option<NaiveDate> {
    let mut parts = file_name.split('-');
    let month = parse_leading_int(parts.next()?)?;
    let day = parse_leading_int(parts.next()?)?;
    let year = parse_leading_int(parts.next()?)?;

    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Game timestamp: file date at midnight plus [`DATE_OFFSET_HOURS`].
pub fn game_date(file_name: &str) -> Result<DateTime<Utc>, ParseError> {
    let date =
        file_date(file_name).ok_or_else(|| ParseError::InvalidFileDate(file_name.to_string()))?;

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc() + Duration::hours(DATE_OFFSET_HOURS))
}
