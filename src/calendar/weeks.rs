use super::util::{
    date_from_julian_day, day_label, is_first_of_month, iter_days_after, julian_day,
    week_of_julian_day, week_start_julian_day, WeekStart, DAYS_IN_WEEK,
};
use crate::error::CalendarError;
use std::ops::Index;
use time::{Date, Weekday};

/// Number of whole weeks between the week containing 1970-01-01 and a given
/// week, under a fixed week-start convention
pub type WeekIndex = i64;

/// Seven consecutive dates, column-ordered so that column 0 falls on the
/// row's week-start weekday
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekRow {
    week: WeekIndex,
    reference: WeekIndex,
    week_start: WeekStart,
    days: [Date; DAYS_IN_WEEK],
}

impl WeekRow {
    pub fn week(&self) -> WeekIndex {
        self.week
    }

    /// The week against which this row's days are judged past or future
    pub fn reference(&self) -> WeekIndex {
        self.reference
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn days(&self) -> &[Date; DAYS_IN_WEEK] {
        &self.days
    }

    pub fn first(&self) -> Date {
        self.days[0]
    }

    pub fn last(&self) -> Date {
        self.days[DAYS_IN_WEEK - 1]
    }

    pub fn get(&self, column: usize) -> Option<Date> {
        self.days.get(column).copied()
    }

    /// Returns the column holding `date`, if any
    pub fn position(&self, date: Date) -> Option<usize> {
        self.days.iter().position(|&d| d == date)
    }

    /// Returns the column holding the first day of a month, if any
    pub fn month_start(&self) -> Option<usize> {
        self.days.iter().position(|&d| is_first_of_month(d))
    }

    pub fn labels(&self) -> [String; DAYS_IN_WEEK] {
        std::array::from_fn(|i| day_label(self.days[i]))
    }

    /// Returns the weekday of the date in `column`, suitable for use as the
    /// selected day after the user picks that cell
    pub fn weekday_at(&self, column: usize) -> Option<Weekday> {
        self.get(column).map(Date::weekday)
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Date>> {
        self.days.iter().copied()
    }
}

impl Index<Weekday> for WeekRow {
    type Output = Date;

    fn index(&self, wd: Weekday) -> &Date {
        &self.days[self.week_start.column_of(wd)]
    }
}

impl<'a> IntoIterator for &'a WeekRow {
    type Item = Date;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Date>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Converts between dates and week indices under one week-start convention
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WeekCalculator(WeekStart);

impl WeekCalculator {
    pub fn new(week_start: WeekStart) -> Self {
        WeekCalculator(week_start)
    }

    pub fn week_start(&self) -> WeekStart {
        self.0
    }

    /// Returns the index of the week containing `now`
    pub fn current_week_index(&self, now: Date) -> WeekIndex {
        week_of_julian_day(julian_day(now), self.0)
    }

    /// Returns the dates of week `week`.  The row's first day is the first
    /// day of `reference` shifted by the number of weeks between `reference`
    /// and `week`; `reference` is also recorded in the row so that layout can
    /// tell past days from future ones.
    ///
    /// Fails with [`CalendarError::OutOfRange`] if any day of the week lies
    /// outside the range of representable dates.
    pub fn week_dates(
        &self,
        week: WeekIndex,
        reference: WeekIndex,
    ) -> Result<WeekRow, CalendarError> {
        let out_of_range = CalendarError::OutOfRange(week);
        let start = week
            .checked_sub(reference)
            .and_then(|offset| offset.checked_mul(7))
            .zip(week_start_julian_day(reference, self.0))
            .and_then(|(shift, base)| base.checked_add(shift))
            .ok_or(out_of_range)?;
        let first = date_from_julian_day(start).ok_or(out_of_range)?;
        // Make sure the whole week is representable before filling it in.
        start
            .checked_add(6)
            .and_then(date_from_julian_day)
            .ok_or(out_of_range)?;
        let mut days = [first; DAYS_IN_WEEK];
        for (slot, d) in days.iter_mut().skip(1).zip(iter_days_after(first)) {
            *slot = d;
        }
        tracing::trace!(week, reference, first = %first, "computed week row");
        Ok(WeekRow {
            week,
            reference,
            week_start: self.0,
            days,
        })
    }

    /// Returns the row for the week containing `date`, judged against the week
    /// containing `today`
    pub fn week_containing(&self, date: Date, today: Date) -> Result<WeekRow, CalendarError> {
        self.week_dates(self.current_week_index(date), self.current_week_index(today))
    }
}
