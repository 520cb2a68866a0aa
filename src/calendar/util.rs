use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Julian Day Number of 1970-01-01, a Thursday
pub const EPOCH_JULIAN_DAY: i64 = 2_440_588;

/// Days from Sunday of the epoch's weekday (Thursday)
const EPOCH_WEEKDAY_ORDINAL: i64 = 4;

pub(crate) trait WeekdayExt {
    /// Number of days from Sunday, so that Sunday is 0 and Saturday is 6
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// Which weekday occupies column 0 of a week row
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Days from Sunday of the first weekday of the week
    pub fn ordinal(self) -> u8 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sunday,
            WeekStart::Monday => Weekday::Monday,
        }
    }

    /// Returns the column in which `wd` is displayed when weeks begin on
    /// `self`
    pub fn column_of(self, wd: Weekday) -> usize {
        let pos = (i16::from(wd.index0()) - i16::from(self.ordinal())).rem_euclid(7);
        usize::try_from(pos).unwrap_or_default()
    }

    /// The Julian day on which week 0 begins: the last day on or before the
    /// epoch that falls on this weekday
    fn epoch_week_start(self) -> i64 {
        let diff = (EPOCH_WEEKDAY_ORDINAL - i64::from(self.ordinal())).rem_euclid(7);
        EPOCH_JULIAN_DAY - diff
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        if s.eq_ignore_ascii_case("sunday") || s.eq_ignore_ascii_case("sun") {
            Ok(WeekStart::Sunday)
        } else if s.eq_ignore_ascii_case("monday") || s.eq_ignore_ascii_case("mon") {
            Ok(WeekStart::Monday)
        } else {
            Err(ParseWeekStartError)
        }
    }
}

impl TryFrom<String> for WeekStart {
    type Error = ParseWeekStartError;

    fn try_from(s: String) -> Result<WeekStart, ParseWeekStartError> {
        s.parse()
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("week start must be \"sunday\" or \"monday\"")]
pub struct ParseWeekStartError;

/// Computes the Julian Day Number of a proleptic Gregorian calendar date
pub fn julian_day(date: Date) -> i64 {
    let month = i64::from(u8::from(date.month()));
    let a = (14 - month) / 12;
    let y = i64::from(date.year()) + 4800 - a;
    let m = month + 12 * a - 3;
    // Floor division keeps the leap-day count right for years before -4800
    let leap_days = y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    i64::from(date.day()) + (153 * m + 2) / 5 + 365 * y + leap_days - 32045
}

/// Returns the Julian day on which week `week` begins under `week_start`
pub(crate) fn week_start_julian_day(week: i64, week_start: WeekStart) -> Option<i64> {
    week.checked_mul(7)?.checked_add(week_start.epoch_week_start())
}

/// Returns the index of the week containing the Julian day `jdn`
pub(crate) fn week_of_julian_day(jdn: i64, week_start: WeekStart) -> i64 {
    (jdn - week_start.epoch_week_start()).div_euclid(7)
}

pub(crate) fn date_from_julian_day(jdn: i64) -> Option<Date> {
    i32::try_from(jdn)
        .ok()
        .and_then(|j| Date::from_julian_day(j).ok())
}

pub(crate) fn is_first_of_month(date: Date) -> bool {
    date.day() == 1
}

/// Returns the label shown in a day's cell: the day of the month, or an
/// abbreviated month name and the day when the date starts a new month
pub fn day_label(date: Date) -> String {
    if is_first_of_month(date) {
        let month = date.month().to_string();
        let abbrev = month.get(..3).unwrap_or(&month);
        format!("{abbrev} {}", date.day())
    } else {
        date.day().to_string()
    }
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}
