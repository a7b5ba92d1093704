//! Month grid layout.
//!
//! # Responsibility
//! - Map `(year, month)` to the ordered cells of a 7-column month grid.
//! - Align day 1 under its weekday column for the configured week start.
//!
//! # Invariants
//! - Output length is `leading_blanks + days_in_month`; no trailing padding.
//! - `leading_blanks` is always in `0..=6`.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUNDAY_FIRST_HEADERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// `(year, month)` does not name a month the calendar can represent.
    InvalidMonth { year: i32, month: u32 },
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid calendar month: year={year} month={month}")
            }
        }
    }
}

impl Error for GridError {}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarDay {
    /// Placeholder before the first of the month.
    Blank,
    /// Day of month, `1..=days_in_month`.
    Day(u32),
}

impl CalendarDay {
    /// Flat cell value: `0` for blanks, the day number otherwise.
    pub fn cell_value(self) -> u32 {
        match self {
            Self::Blank => 0,
            Self::Day(day) => day,
        }
    }

    pub fn day(self) -> Option<u32> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(day),
        }
    }
}

/// Grid generator bound to one first-day-of-week convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarGrid {
    week_start: Weekday,
}

impl Default for CalendarGrid {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl CalendarGrid {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Generates the grid cells for `(year, month)`.
    ///
    /// # Errors
    /// - `GridError::InvalidMonth` when `month` is outside `1..=12` or the
    ///   year is outside the supported date range.
    pub fn generate_days(&self, year: i32, month: u32) -> GridResult<Vec<CalendarDay>> {
        let blanks = self.leading_blanks(year, month)?;
        let last_day = days_in_month(year, month)?;

        let mut days = Vec::with_capacity((blanks + last_day) as usize);
        days.extend((0..blanks).map(|_| CalendarDay::Blank));
        days.extend((1..=last_day).map(CalendarDay::Day));
        Ok(days)
    }

    /// Number of blank cells before day 1 of `(year, month)`.
    pub fn leading_blanks(&self, year: i32, month: u32) -> GridResult<u32> {
        let first = first_of_month(year, month)?;
        Ok(weekday_position(first.weekday(), self.week_start) - 1)
    }

    /// Single-letter weekday headers, starting at the configured week start.
    pub fn weekday_headers(&self) -> Vec<&'static str> {
        let offset = self.week_start.num_days_from_sunday() as usize;
        (0..SUNDAY_FIRST_HEADERS.len())
            .map(|column| SUNDAY_FIRST_HEADERS[(column + offset) % SUNDAY_FIRST_HEADERS.len()])
            .collect()
    }
}

/// 1-based column of `weekday` in a week starting at `week_start`.
pub fn weekday_position(weekday: Weekday, week_start: Weekday) -> u32 {
    let from_start =
        (weekday.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
    from_start + 1
}

pub fn first_of_month(year: i32, month: u32) -> GridResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(GridError::InvalidMonth { year, month })
}

/// Length of `(year, month)` in days, `28..=31`.
pub fn days_in_month(year: i32, month: u32) -> GridResult<u32> {
    let first = first_of_month(year, month)?;
    let next_first = first
        .checked_add_months(Months::new(1))
        .ok_or(GridError::InvalidMonth { year, month })?;
    let length = next_first.signed_duration_since(first).num_days();
    Ok(length as u32)
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, weekday_position, CalendarDay, CalendarGrid, GridError};
    use chrono::Weekday;

    #[test]
    fn march_2025_starts_on_saturday_with_six_blanks() {
        let days = CalendarGrid::default().generate_days(2025, 3).unwrap();

        assert_eq!(days.len(), 6 + 31);
        assert!(days[..6].iter().all(|day| *day == CalendarDay::Blank));
        assert_eq!(days[6], CalendarDay::Day(1));
        assert_eq!(days.last(), Some(&CalendarDay::Day(31)));
    }

    #[test]
    fn monday_start_shifts_blanks() {
        let grid = CalendarGrid::new(Weekday::Mon);
        assert_eq!(grid.leading_blanks(2025, 3).unwrap(), 5);
        // 2024-09-01 is a Sunday: last column in a Monday-first week.
        assert_eq!(grid.leading_blanks(2024, 9).unwrap(), 6);
        // 2025-09-01 is a Monday.
        assert_eq!(grid.leading_blanks(2025, 9).unwrap(), 0);
    }

    #[test]
    fn weekday_positions_cover_whole_week() {
        let week = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        for (index, weekday) in week.iter().enumerate() {
            assert_eq!(weekday_position(*weekday, Weekday::Sun), index as u32 + 1);
        }
        assert_eq!(weekday_position(Weekday::Sun, Weekday::Mon), 7);
    }

    #[test]
    fn month_lengths_follow_calendar() {
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 4).unwrap(), 30);
        assert_eq!(days_in_month(2025, 12).unwrap(), 31);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let grid = CalendarGrid::default();
        assert_eq!(
            grid.generate_days(2025, 13).unwrap_err(),
            GridError::InvalidMonth {
                year: 2025,
                month: 13
            }
        );
        assert!(grid.generate_days(2025, 0).is_err());
    }

    #[test]
    fn headers_rotate_with_week_start() {
        assert_eq!(
            CalendarGrid::default().weekday_headers(),
            vec!["S", "M", "T", "W", "T", "F", "S"]
        );
        assert_eq!(
            CalendarGrid::new(Weekday::Mon).weekday_headers(),
            vec!["M", "T", "W", "T", "F", "S", "S"]
        );
    }

    #[test]
    fn cell_values_flatten_blanks_to_zero() {
        assert_eq!(CalendarDay::Blank.cell_value(), 0);
        assert_eq!(CalendarDay::Day(17).cell_value(), 17);
        assert_eq!(CalendarDay::Blank.day(), None);
    }
}
