//! Scalar normalization for OpenDART string fields
//!
//! OpenDART returns every value as a string: numbers carry thousands
//! separators, ratios may end in `%`, dates come in several layouts and
//! `"-"` stands in for "not applicable".

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::ParseError;

/// Value OpenDART uses for "no data"
pub const SENTINEL: &str = "-";

const THOUSANDS_SEPARATOR: char = ',';

const KOREAN_DATE_FORMAT: &str = "%Y년 %m월 %d일";

/// Layouts tried in order by [`parse_flexible_date`]; month-first wins over day-first
const DATE_FORMATS: &[&str] = &[
    "%Y%m%d",
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%Y. %m. %d.",
    "%Y. %m. %d",
    KOREAN_DATE_FORMAT,
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y.%m.%d %H:%M:%S"];

/// A parsed numeric field: an integer when the text has no fractional part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(Decimal),
}

impl Number {
    /// Integer value, if this number has no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(value) => Some(*value),
            Number::Decimal(_) => None,
        }
    }

    pub fn to_decimal(&self) -> Decimal {
        match self {
            Number::Integer(value) => Decimal::from(*value),
            Number::Decimal(value) => *value,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            Number::Decimal(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Number::Decimal(value)
    }
}

/// Parse a localized number such as `"1,234,567"` or `"12.5"`
pub fn parse_numeric(raw: &str) -> Result<Number, ParseError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .collect();

    if !is_plain_number(&cleaned) {
        return Err(ParseError::NotNumeric { raw: raw.to_string() });
    }

    if let Ok(value) = cleaned.parse::<i64>() {
        return Ok(Number::Integer(value));
    }

    Decimal::from_str(&cleaned)
        .map(Number::Decimal)
        .map_err(|_| ParseError::NotNumeric { raw: raw.to_string() })
}

/// Optional sign, ASCII digits and at most one decimal point
fn is_plain_number(value: &str) -> bool {
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Parse a number, yielding `None` when `raw` is exactly `sentinel`
pub fn parse_numeric_or_absent(raw: &str, sentinel: &str) -> Result<Option<Number>, ParseError> {
    if raw == sentinel {
        return Ok(None);
    }
    parse_numeric(raw).map(Some)
}

/// Parse a ratio such as `"45.2%"`; the trailing `%` is optional
pub fn parse_percentage(raw: &str) -> Result<Number, ParseError> {
    let trimmed = raw.trim_end();
    parse_numeric(trimmed.strip_suffix('%').unwrap_or(trimmed))
}

/// Parse the fixed `YYYY년 MM월 DD일` layout
pub fn parse_korean_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), KOREAN_DATE_FORMAT).map_err(|source| {
        ParseError::InvalidDate {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Best-effort date parsing across the layouts OpenDART and filers use
pub fn parse_flexible_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ParseError> {
    let raw = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    {
        return Ok(Some(date));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| Some(datetime.date()))
        .ok_or_else(|| ParseError::UnrecognizedDate { raw: raw.to_string() })
}
