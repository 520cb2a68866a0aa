use super::weeks::{WeekCalculator, WeekIndex, WeekRow};
use crate::error::CalendarError;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// A run of consecutive week rows, as shown by a scrolling week list
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeekWindow {
    calculator: WeekCalculator,
    reference: WeekIndex,
    rows: VecDeque<WeekRow>,
}

impl WeekWindow {
    /// Builds `week_qty` rows with `center` placed in the middle (or just
    /// above the middle when `week_qty` is even)
    pub fn around(
        calculator: WeekCalculator,
        center: WeekIndex,
        reference: WeekIndex,
        week_qty: NonZeroUsize,
    ) -> Result<Self, CalendarError> {
        let above = i64::try_from((week_qty.get() - 1) / 2)
            .map_err(|_| CalendarError::OutOfRange(center))?;
        let first = center
            .checked_sub(above)
            .ok_or(CalendarError::OutOfRange(center))?;
        let rows = build_rows(calculator, first, reference, week_qty.get())?;
        Ok(WeekWindow {
            calculator,
            reference,
            rows,
        })
    }

    pub fn rows(&self) -> &VecDeque<WeekRow> {
        &self.rows
    }

    pub fn reference(&self) -> WeekIndex {
        self.reference
    }

    pub fn first_week(&self) -> WeekIndex {
        self.rows.front().map_or(self.reference, WeekRow::week)
    }

    pub fn last_week(&self) -> WeekIndex {
        self.rows.back().map_or(self.reference, WeekRow::week)
    }

    pub fn week_qty(&self) -> usize {
        self.rows.len()
    }

    pub fn jump_to(&mut self, center: WeekIndex) -> Result<(), CalendarError> {
        let qty = NonZeroUsize::new(self.rows.len()).unwrap_or(NonZeroUsize::MIN);
        *self = WeekWindow::around(self.calculator, center, self.reference, qty)?;
        Ok(())
    }

    pub fn jump_to_reference(&mut self) -> Result<(), CalendarError> {
        self.jump_to(self.reference)
    }

    pub fn one_week_forwards(&mut self) -> Result<(), CalendarError> {
        let week = next_week(self.last_week(), 1)?;
        let row = self.calculator.week_dates(week, self.reference)?;
        self.rows.pop_front();
        self.rows.push_back(row);
        Ok(())
    }

    pub fn one_week_backwards(&mut self) -> Result<(), CalendarError> {
        let week = next_week(self.first_week(), -1)?;
        let row = self.calculator.week_dates(week, self.reference)?;
        self.rows.pop_back();
        self.rows.push_front(row);
        Ok(())
    }

    pub fn one_page_forwards(&mut self) -> Result<(), CalendarError> {
        let first = next_week(self.last_week(), 1)?;
        self.rows = build_rows(self.calculator, first, self.reference, self.rows.len())?;
        Ok(())
    }

    pub fn one_page_backwards(&mut self) -> Result<(), CalendarError> {
        let qty = i64::try_from(self.rows.len())
            .map_err(|_| CalendarError::OutOfRange(self.first_week()))?;
        let first = next_week(self.first_week(), -qty)?;
        self.rows = build_rows(self.calculator, first, self.reference, self.rows.len())?;
        Ok(())
    }
}

fn next_week(week: WeekIndex, delta: i64) -> Result<WeekIndex, CalendarError> {
    week.checked_add(delta).ok_or(CalendarError::OutOfRange(week))
}

fn build_rows(
    calculator: WeekCalculator,
    first: WeekIndex,
    reference: WeekIndex,
    qty: usize,
) -> Result<VecDeque<WeekRow>, CalendarError> {
    let mut rows = VecDeque::with_capacity(qty + 1);
    let mut week = first;
    for _ in 0..qty {
        rows.push_back(calculator.week_dates(week, reference)?);
        week = next_week(week, 1)?;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeekStart;
    use time::macros::date;

    fn weeks(window: &WeekWindow) -> Vec<WeekIndex> {
        window.rows().iter().map(WeekRow::week).collect()
    }

    fn qty(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_around_odd() {
        let calc = WeekCalculator::new(WeekStart::Sunday);
        let window = WeekWindow::around(calc, 100, 100, qty(5)).unwrap();
        assert_eq!(weeks(&window), [98, 99, 100, 101, 102]);
        assert!(window.rows().iter().all(|r| r.reference() == 100));
    }

    #[test]
    fn test_around_even() {
        let calc = WeekCalculator::new(WeekStart::Sunday);
        let window = WeekWindow::around(calc, 100, 100, qty(4)).unwrap();
        assert_eq!(weeks(&window), [99, 100, 101, 102]);
    }

    #[test]
    fn test_rows_are_contiguous() {
        let calc = WeekCalculator::new(WeekStart::Monday);
        let today = date!(2025 - 01 - 22);
        let current = calc.current_week_index(today);
        let window = WeekWindow::around(calc, current, current, qty(6)).unwrap();
        let rows = window.rows();
        for (a, b) in rows.iter().zip(rows.iter().skip(1)) {
            assert_eq!(a.last().next_day(), Some(b.first()));
        }
        assert!(rows.iter().any(|r| r.position(today).is_some()));
    }

    #[test]
    fn test_scroll() {
        let calc = WeekCalculator::new(WeekStart::Sunday);
        let mut window = WeekWindow::around(calc, 10, 10, qty(3)).unwrap();
        window.one_week_forwards().unwrap();
        assert_eq!(weeks(&window), [10, 11, 12]);
        window.one_week_backwards().unwrap();
        window.one_week_backwards().unwrap();
        assert_eq!(weeks(&window), [8, 9, 10]);
    }

    #[test]
    fn test_page() {
        let calc = WeekCalculator::new(WeekStart::Sunday);
        let mut window = WeekWindow::around(calc, 10, 10, qty(3)).unwrap();
        window.one_page_forwards().unwrap();
        assert_eq!(weeks(&window), [12, 13, 14]);
        window.one_page_backwards().unwrap();
        window.one_page_backwards().unwrap();
        assert_eq!(weeks(&window), [6, 7, 8]);
        window.jump_to_reference().unwrap();
        assert_eq!(weeks(&window), [9, 10, 11]);
    }

    #[test]
    fn test_end_of_time() {
        let calc = WeekCalculator::new(WeekStart::Sunday);
        let last = calc.current_week_index(date!(9999 - 12 - 24));
        let mut window = WeekWindow::around(calc, last - 1, 0, qty(3)).unwrap();
        assert_eq!(weeks(&window), [last - 2, last - 1, last]);
        assert_eq!(
            window.one_week_forwards(),
            Err(CalendarError::OutOfRange(last + 1))
        );
        assert_eq!(weeks(&window), [last - 2, last - 1, last]);
        assert!(window.one_page_forwards().is_err());
        assert_eq!(weeks(&window), [last - 2, last - 1, last]);
    }
}
