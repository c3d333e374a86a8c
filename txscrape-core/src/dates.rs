// Parsing of the explorer's "05 Mar 23, 2:30 pm" timestamps

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Failed to convert '{0}': expected '<day> <mon> <yy>, <h:mm> <am|pm>'")]
    Malformed(String),

    #[error("Failed to convert '{0}' into a day")]
    Day(String),

    #[error("Failed to convert '{0}' into a month")]
    Month(String),

    #[error("Failed to convert '{0}' into a year")]
    Year(String),

    #[error("Failed to convert '{0}' into a time")]
    Time(String),

    #[error("'{0}' is not a valid calendar date and time")]
    OutOfRange(String),
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// One-based month number for a three letter abbreviation, any case.
pub fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    let lower = abbrev.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|index| index as u32 + 1)
}

/// Convert a 12-hour clock reading to a 24-hour hour.
fn to_24_hour(hour: u32, pm: bool) -> u32 {
    match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    }
}

/// Parse `"<day> <mon> <yy>, <h:mm> <am|pm>"` into a timestamp.
///
/// Two-digit years are read as 20YY. Every failure names the token that
/// could not be converted and is logged before it is returned.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, DateParseError> {
    let result = parse_parts(text.trim());
    match &result {
        Ok(parsed) => debug!("Parsed '{}' as {}", text.trim(), parsed),
        Err(e) => warn!("{}", e),
    }
    result
}

fn parse_parts(text: &str) -> Result<NaiveDateTime, DateParseError> {
    let sections: Vec<&str> = text.split(", ").collect();
    let [date_section, time_section] = sections[..] else {
        return Err(DateParseError::Malformed(text.to_string()));
    };

    let date_tokens: Vec<&str> = date_section.split_whitespace().collect();
    let [day, month, year] = date_tokens[..] else {
        return Err(DateParseError::Malformed(text.to_string()));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| DateParseError::Day(day.to_string()))?;
    let month =
        month_from_abbrev(month).ok_or_else(|| DateParseError::Month(month.to_string()))?;
    let year: i32 = format!("20{}", year)
        .parse()
        .map_err(|_| DateParseError::Year(year.to_string()))?;

    let (hour, minute) = parse_clock(time_section)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| DateParseError::OutOfRange(text.to_string()))
}

fn parse_clock(time_section: &str) -> Result<(u32, u32), DateParseError> {
    let time_error = || DateParseError::Time(time_section.to_string());

    let tokens: Vec<&str> = time_section.split_whitespace().collect();
    let [clock, marker] = tokens[..] else {
        return Err(time_error());
    };
    let pm = match marker.to_lowercase().as_str() {
        "am" => false,
        "pm" => true,
        _ => return Err(time_error()),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let [hour, minute] = parts[..] else {
        return Err(time_error());
    };
    let hour: u32 = hour.parse().map_err(|_| time_error())?;
    let minute: u32 = minute.parse().map_err(|_| time_error())?;
    if hour > 12 {
        return Err(time_error());
    }

    Ok((to_24_hour(hour, pm), minute))
}

/// The user's requested window. Logged but not applied to the scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        if from > to {
            warn!("Date range starts after it ends: {} > {}", from, to);
        }
        Self { from, to }
    }
}
