//! Canonical calendar date identifier.
//!
//! # Responsibility
//! - Derive the `yyyy-MM-dd` key used to attach events to one date.
//! - Reject strings that are not a real, canonically formatted date.
//!
//! # Invariants
//! - A `DateKey` always renders as exactly ten characters `yyyy-MM-dd`.
//! - Parsing and rendering are inverse: `parse(key.to_string()) == key`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
const MIN_KEY_YEAR: i32 = 0;
const MAX_KEY_YEAR: i32 = 9999;

/// Validation errors for date-key derivation and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// `(year, month, day)` does not name a real calendar date.
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Year cannot be rendered with four digits.
    YearOutOfRange(i32),
    /// Input string is not a canonical `yyyy-MM-dd` date.
    Malformed(String),
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { year, month, day } => {
                write!(f, "no such calendar date: {year}-{month}-{day}")
            }
            Self::YearOutOfRange(year) => write!(
                f,
                "year {year} is outside supported range {MIN_KEY_YEAR}..={MAX_KEY_YEAR}"
            ),
            Self::Malformed(value) => write!(f, "malformed date key `{value}`; expected yyyy-MM-dd"),
        }
    }
}

impl Error for DateKeyError {}

/// Identifies one calendar date; renders as `yyyy-MM-dd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Builds a key from calendar components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateKeyError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateKeyError::InvalidDate { year, month, day })?;
        Self::from_date(date)
    }

    /// Builds a key from an existing date.
    pub fn from_date(date: NaiveDate) -> Result<Self, DateKeyError> {
        if !(MIN_KEY_YEAR..=MAX_KEY_YEAR).contains(&date.year()) {
            return Err(DateKeyError::YearOutOfRange(date.year()));
        }
        Ok(Self(date))
    }

    /// Builds the key for `day` in the month that contains `reference`.
    ///
    /// This is how the grid maps a tapped day number back to a date.
    pub fn for_day(reference: NaiveDate, day: u32) -> Result<Self, DateKeyError> {
        Self::from_ymd(reference.year(), reference.month(), day)
    }

    /// Parses a canonical `yyyy-MM-dd` string.
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let malformed = || DateKeyError::Malformed(value.to_string());
        if value.len() != 10 {
            return Err(malformed());
        }
        let date = NaiveDate::parse_from_str(value, DATE_KEY_FORMAT).map_err(|_| malformed())?;
        let key = Self::from_date(date).map_err(|_| malformed())?;
        // chrono accepts unpadded fields; only the canonical spelling is a key.
        if key.to_string() != value {
            return Err(malformed());
        }
        Ok(key)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}
