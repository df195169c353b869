use chrono::Month;
use log::warn;

use crate::error::{ChartError, Result};
use crate::types::{DateMode, Granularity};

/// Turn a series date key into a display label.
///
/// Weekly keys (`"Week 2, Jan 2025"`) become `"2025 Week 2"` whatever the
/// mode. Daily keys (`"2025-01-05"`) become `"Jan"`, `"Jan 05"` or
/// `"01/05/2025"` depending on `mode`, keeping the raw month and day digits.
pub fn format_date(date_key: &str, mode: DateMode, granularity: Granularity) -> Result<String> {
    match granularity {
        Granularity::Week => format_week_key(date_key),
        Granularity::Day => format_day_key(date_key, mode),
    }
}

/// Like [`format_date`], falling back to the raw key (with a warning) when
/// the key cannot be parsed.
pub fn display_date(date_key: &str, mode: DateMode, granularity: Granularity) -> String {
    format_date(date_key, mode, granularity).unwrap_or_else(|err| {
        warn!("{}", err);
        date_key.to_string()
    })
}

fn format_week_key(date_key: &str) -> Result<String> {
    let malformed = || ChartError::MalformedDate(date_key.to_string());
    let (week, month_year) = date_key.split_once(',').ok_or_else(malformed)?;
    let year = month_year.split_whitespace().nth(1).ok_or_else(malformed)?;
    Ok(format!("{} {}", year, week.trim()))
}

fn format_day_key(date_key: &str, mode: DateMode) -> Result<String> {
    let malformed = || ChartError::MalformedDate(date_key.to_string());
    let mut parts = date_key.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let month_name = month
        .parse::<u8>()
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(short_month_name)
        .ok_or_else(malformed)?;

    Ok(match mode {
        DateMode::Month => month_name.to_string(),
        DateMode::DayMonth => format!("{} {}", month_name, day),
        DateMode::Full => format!("{}/{}/{}", month, day, year),
    })
}

fn short_month_name(month: Month) -> &'static str {
    &month.name()[..3]
}
