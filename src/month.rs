//! The calendar month that scopes every query, and the date window it covers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, Month as CalendarMonth, OffsetDateTime};

use crate::Error;

/// The year used to build month windows when none is configured.
///
/// The seed dataset only contains sales from this year.
pub const DEFAULT_WINDOW_YEAR: i32 = 2022;

/// A calendar month, ignoring the year.
///
/// Parsed from the strings "01" to "12". A single digit ("1" to "9") is also
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(CalendarMonth);

impl Month {
    /// The month selected when the dashboard is first opened.
    pub const DEFAULT: Month = Month(CalendarMonth::March);

    /// Parse a month from a one or two digit month number.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is not a number from 1 to 12.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let number: u8 = text.parse().map_err(|_| invalid())?;

        CalendarMonth::try_from(number)
            .map(Month)
            .map_err(|_| invalid())
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12u8).filter_map(|number| CalendarMonth::try_from(number).ok().map(Month))
    }

    /// The English name of the month, e.g. "March".
    pub fn name(self) -> String {
        self.0.to_string()
    }

    /// The half-open window covering this month of `year`.
    ///
    /// December rolls over to January of the following year.
    pub fn window(self, year: i32) -> Result<MonthWindow, Error> {
        let start = Date::from_calendar_date(year, self.0, 1)
            .map_err(|_| Error::InvalidMonth(format!("{year}-{self}")))?;
        let end_year = if self.0 == CalendarMonth::December {
            year + 1
        } else {
            year
        };
        let end = Date::from_calendar_date(end_year, self.0.next(), 1)
            .map_err(|_| Error::InvalidMonth(format!("{end_year}-{}", self.0.next() as u8)))?;

        Ok(MonthWindow {
            start: start.midnight().assume_utc(),
            end: end.midnight().assume_utc(),
        })
    }
}

impl Default for Month {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0 as u8)
    }
}

impl TryFrom<String> for Month {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Month::parse(&value)
    }
}

impl From<Month> for String {
    fn from(value: Month) -> Self {
        value.to_string()
    }
}

/// A half-open date range `[start, end)` covering one calendar month in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Midnight on the first day of the month.
    pub start: OffsetDateTime,
    /// Midnight on the first day of the following month.
    pub end: OffsetDateTime,
}

impl MonthWindow {
    /// The window bounds as Unix timestamps in milliseconds, as stored in the database.
    pub(crate) fn as_millis(&self) -> (i64, i64) {
        (to_millis(self.start), to_millis(self.end))
    }

    /// Whether `date_time` falls inside the window.
    #[cfg(test)]
    pub(crate) fn contains(&self, date_time: OffsetDateTime) -> bool {
        self.start <= date_time && date_time < self.end
    }
}

pub(crate) fn to_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{Error, month::DEFAULT_WINDOW_YEAR};

    use super::Month;

    #[test]
    fn parses_two_digit_months() {
        for (number, text) in (1..=12u8).zip([
            "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
        ]) {
            let month = Month::parse(text).unwrap();
            assert_eq!(month.to_string(), text);
            assert_eq!(month.0 as u8, number);
        }
    }

    #[test]
    fn parses_single_digit_months() {
        assert_eq!(Month::parse("3"), Month::parse("03"));
    }

    #[test]
    fn rejects_invalid_months() {
        for text in ["", "0", "00", "13", "ab", "-1", "001", "1.5"] {
            assert_eq!(
                Month::parse(text),
                Err(Error::InvalidMonth(text.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn window_covers_month_of_configured_year() {
        let window = Month::parse("03").unwrap().window(DEFAULT_WINDOW_YEAR).unwrap();

        assert_eq!(window.start, datetime!(2022-03-01 0:00 UTC));
        assert_eq!(window.end, datetime!(2022-04-01 0:00 UTC));
    }

    #[test]
    fn window_end_is_first_of_next_month_for_january_to_november() {
        for (month, next) in Month::all().zip(Month::all().skip(1)) {
            let window = month.window(2022).unwrap();
            let next_window = next.window(2022).unwrap();

            assert_eq!(window.end, next_window.start, "month {month}");
        }
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let window = Month::parse("12").unwrap().window(2022).unwrap();

        assert_eq!(window.start, datetime!(2022-12-01 0:00 UTC));
        assert_eq!(window.end, datetime!(2023-01-01 0:00 UTC));
    }

    #[test]
    fn window_is_half_open() {
        let window = Month::parse("03").unwrap().window(2022).unwrap();

        assert!(window.contains(datetime!(2022-03-01 0:00 UTC)));
        assert!(window.contains(datetime!(2022-03-31 23:59:59 UTC)));
        assert!(!window.contains(datetime!(2022-04-01 0:00 UTC)));
        assert!(!window.contains(datetime!(2021-03-15 0:00 UTC)));
    }

    #[test]
    fn window_year_is_configurable() {
        let window = Month::parse("07").unwrap().window(2021).unwrap();

        assert_eq!(window.start, datetime!(2021-07-01 0:00 UTC));
        assert_eq!(window.end, datetime!(2021-08-01 0:00 UTC));
    }

    #[test]
    fn deserializes_from_string() {
        let month: Month = serde_json::from_str("\"11\"").unwrap();
        assert_eq!(month, Month::parse("11").unwrap());

        assert!(serde_json::from_str::<Month>("\"13\"").is_err());
    }

    #[test]
    fn month_names() {
        assert_eq!(Month::DEFAULT.name(), "March");
        assert_eq!(Month::all().count(), 12);
    }
}
