//! Calendar-day normalisation in UTC.
//!
//! Check-ins, streaks, and trend windows all reason about whole days. A
//! [`CalendarDay`] is the UTC date a timestamp falls on; its start is UTC
//! midnight and its bounds form the half-open range `[start, start + 1 day)`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_DATE_LEN: usize = 10;

/// Failures raised while normalising calendar input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDate {
    /// The value is not a `YYYY-MM-DD` string naming a real date.
    #[error("'{value}' is not a valid YYYY-MM-DD date")]
    Malformed { value: String },
    /// An age was requested for a reference day before the birth date.
    #[error("reference day {reference} precedes birth date {birth}")]
    ReferenceBeforeBirth {
        birth: CalendarDay,
        reference: CalendarDay,
    },
}

/// A single UTC calendar day.
///
/// # Examples
/// ```
/// use sentinela::domain::CalendarDay;
///
/// let day = CalendarDay::parse_iso("2024-06-15").expect("valid date");
/// assert_eq!(day.to_string(), "2024-06-15");
/// assert!(CalendarDay::parse_iso("2023-02-30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay(NaiveDate);

/// Half-open timestamp range covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    /// UTC midnight at the start of the day.
    pub start: DateTime<Utc>,
    /// UTC midnight at the start of the following day (exclusive).
    pub end: DateTime<Utc>,
}

impl DayBounds {
    /// Whether `instant` falls inside the range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl CalendarDay {
    /// Wrap an existing date.
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// Impossible dates and any other layout are rejected rather than
    /// coerced into a neighbouring day.
    pub fn parse_iso(value: &str) -> Result<Self, InvalidDate> {
        let malformed = || InvalidDate::Malformed {
            value: value.to_owned(),
        };
        let well_shaped = value.len() == ISO_DATE_LEN
            && value.bytes().enumerate().all(|(index, byte)| match index {
                4 | 7 => byte == b'-',
                _ => byte.is_ascii_digit(),
            });
        if !well_shaped {
            return Err(malformed());
        }
        NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
            .map(Self)
            .map_err(|_| malformed())
    }

    /// The UTC day an instant falls on.
    pub fn from_timestamp(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    /// Today according to the supplied clock.
    pub fn today(clock: &dyn Clock) -> Self {
        Self::from_timestamp(clock.utc())
    }

    /// Underlying date value.
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// UTC midnight at the start of this day.
    pub fn start(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Timestamp bounds usable for range queries.
    pub fn bounds(self) -> DayBounds {
        let start = self.start();
        DayBounds {
            start,
            end: self.next().start(),
        }
    }

    /// The following day, saturating at the maximum representable date.
    pub fn next(self) -> Self {
        self.plus_days(1)
    }

    /// Move forward by `days`, saturating at the maximum representable date.
    pub fn plus_days(self, days: u32) -> Self {
        Self(
            self.0
                .checked_add_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MAX),
        )
    }

    /// Move back by `days`, saturating at the minimum representable date.
    pub fn minus_days(self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Signed whole-day distance from `earlier` to `self`.
    ///
    /// Positive when `earlier` precedes `self`.
    pub fn days_since(self, earlier: Self) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso(s)
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = InvalidDate;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_iso(&value)
    }
}

impl From<CalendarDay> for String {
    fn from(value: CalendarDay) -> Self {
        value.to_string()
    }
}

/// Inclusive window of days ending on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// First day of the window.
    pub first: CalendarDay,
    /// Last day of the window.
    pub last: CalendarDay,
}

impl DayWindow {
    /// Window `[last - trailing_days, last]`.
    ///
    /// # Examples
    /// ```
    /// use sentinela::domain::{CalendarDay, DayWindow};
    ///
    /// let today = CalendarDay::parse_iso("2024-03-10").expect("valid date");
    /// let window = DayWindow::trailing(today, 7);
    /// assert_eq!(window.first.to_string(), "2024-03-03");
    /// assert!(window.contains(today));
    /// ```
    pub fn trailing(last: CalendarDay, trailing_days: u32) -> Self {
        Self {
            first: last.minus_days(trailing_days),
            last,
        }
    }

    /// Whether `day` lies within the window.
    pub fn contains(&self, day: CalendarDay) -> bool {
        self.first <= day && day <= self.last
    }

    /// Every day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.first
            .0
            .iter_days()
            .take_while(|date| *date <= self.last.0)
            .map(CalendarDay)
    }
}

/// Whole years elapsed between `birth` and `reference`.
///
/// One year is subtracted when the anniversary has not yet occurred in the
/// reference year.
///
/// # Examples
/// ```
/// use sentinela::domain::{CalendarDay, age_on};
///
/// let birth = CalendarDay::parse_iso("1990-06-15").expect("valid date");
/// let eve = CalendarDay::parse_iso("2024-06-14").expect("valid date");
/// let birthday = CalendarDay::parse_iso("2024-06-15").expect("valid date");
/// assert_eq!(age_on(birth, eve).expect("age"), 33);
/// assert_eq!(age_on(birth, birthday).expect("age"), 34);
/// ```
pub fn age_on(birth: CalendarDay, reference: CalendarDay) -> Result<u32, InvalidDate> {
    if reference < birth {
        return Err(InvalidDate::ReferenceBeforeBirth { birth, reference });
    }
    let (birth_date, reference_date) = (birth.0, reference.0);
    let mut years = reference_date.year() - birth_date.year();
    if (reference_date.month(), reference_date.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).map_err(|_| InvalidDate::ReferenceBeforeBirth { birth, reference })
}
