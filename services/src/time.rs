use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Western Indonesia Time is a fixed UTC+7 offset.
pub const WIB_OFFSET_HOURS: i64 = 7;

static WIB_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2})$").expect("valid WIB regex")
});

/// Parses a `YYYY-MM-DDTHH:MM` wall-clock time in WIB into UTC.
///
/// Returns `None` when the text does not match the pattern or names a civil
/// date-time that does not exist (e.g. `2025-02-30T10:00`).
pub fn parse_wib_datetime(value: &str) -> Option<DateTime<Utc>> {
    let caps = WIB_INPUT.captures(value)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = i32::try_from(num(1)?).ok()?;
    let local = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?.and_hms_opt(num(4)?, num(5)?, 0)?;

    Some(local.and_utc() - Duration::hours(WIB_OFFSET_HOURS))
}
