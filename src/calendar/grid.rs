use super::util::{day_label, DAYS_IN_WEEK};
use super::weeks::WeekRow;
use crate::error::CalendarError;
use std::cmp::Ordering;
use time::{Date, Weekday};

/// Horizontal extent of a column in pixels, covering `left..right`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ColumnBounds {
    pub left: u32,
    pub right: u32,
}

impl ColumnBounds {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn contains(&self, x: u32) -> bool {
        (self.left..self.right).contains(&x)
    }
}

/// How a day relates to today, used to dim days that have already passed
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DayClass {
    Past,
    Present,
    Future,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Cell {
    pub date: Date,
    pub label: String,
    pub bounds: ColumnBounds,
    pub class: DayClass,
}

/// Which edge of a cell the month seam runs along
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Edge {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// The place in a row at which a new month begins.  The seam runs along the
/// bottom of every column before `column` and along the top of `column` and
/// every column after it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MonthBoundary {
    pub column: usize,
}

impl MonthBoundary {
    pub fn edge(&self, column: usize) -> Edge {
        if column < self.column {
            Edge::Bottom
        } else {
            Edge::Top
        }
    }
}

/// Pixel layout of a single week row
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GridGeometry {
    cells: Vec<Cell>,
    today: Option<usize>,
    selected: Option<usize>,
    month_boundary: Option<MonthBoundary>,
}

impl GridGeometry {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Column containing today's date, if today falls in this row
    pub fn today(&self) -> Option<usize> {
        self.today
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn month_boundary(&self) -> Option<MonthBoundary> {
        self.month_boundary
    }

    pub fn today_bounds(&self) -> Option<ColumnBounds> {
        self.bounds_of(self.today)
    }

    pub fn selected_bounds(&self) -> Option<ColumnBounds> {
        self.bounds_of(self.selected)
    }

    fn bounds_of(&self, column: Option<usize>) -> Option<ColumnBounds> {
        column.and_then(|i| self.cell(i)).map(|c| c.bounds)
    }

    /// Returns the column under horizontal position `x`, or `None` if `x` is
    /// not within the row
    pub fn column_at(&self, x: u32) -> Option<usize> {
        self.cells.iter().position(|c| c.bounds.contains(x))
    }

    /// Returns the points of the month seam drawn across a row `height`
    /// pixels tall, or `None` if no month starts in this row
    pub fn month_seam(&self, height: u32) -> Option<Vec<Point>> {
        let boundary = self.month_boundary?;
        let y_of = |edge: Edge| match edge {
            Edge::Top => 0,
            Edge::Bottom => height,
        };
        let mut points = vec![Point {
            x: 0,
            y: y_of(boundary.edge(0)),
        }];
        for (i, cell) in self.cells.iter().enumerate() {
            let y = y_of(boundary.edge(i));
            if i == boundary.column {
                points.push(Point {
                    x: cell.bounds.left,
                    y,
                });
            }
            points.push(Point {
                x: cell.bounds.right,
                y,
            });
        }
        points.dedup();
        Some(points)
    }
}

/// Lays week rows out across a fixed pixel width
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridLayout {
    pixel_width: u32,
    cell_count: usize,
    today: Option<Date>,
    selected: Option<Weekday>,
}

impl GridLayout {
    pub fn new(pixel_width: u32) -> Self {
        GridLayout {
            pixel_width,
            cell_count: DAYS_IN_WEEK,
            today: None,
            selected: None,
        }
    }

    pub fn cell_count(mut self, cell_count: usize) -> Self {
        self.cell_count = cell_count;
        self
    }

    pub fn today(mut self, today: Option<Date>) -> Self {
        self.today = today;
        self
    }

    /// Marks the day falling on `weekday` as selected
    pub fn selected(mut self, weekday: Option<Weekday>) -> Self {
        self.selected = weekday;
        self
    }

    pub fn layout(&self, row: &WeekRow) -> Result<GridGeometry, CalendarError> {
        if self.pixel_width == 0 {
            return Err(CalendarError::ZeroWidth);
        }
        if self.cell_count == 0 {
            return Err(CalendarError::ZeroCellCount);
        }
        if self.cell_count != row.days().len() {
            return Err(CalendarError::RowLength {
                expected: self.cell_count,
                actual: row.days().len(),
            });
        }
        let today = self.today.and_then(|d| row.position(d));
        let selected = self.selected.map(|wd| row.week_start().column_of(wd));
        let month_boundary = row
            .iter()
            .map(day_label)
            .position(|label| label.len() > 2)
            .map(|column| MonthBoundary { column });
        let cells = row
            .iter()
            .enumerate()
            .map(|(i, date)| Cell {
                date,
                label: day_label(date),
                bounds: ColumnBounds {
                    left: self.edge(i),
                    right: self.edge(i + 1),
                },
                class: classify(row, today, i),
            })
            .collect();
        tracing::debug!(
            week = row.week(),
            reference = row.reference(),
            width = self.pixel_width,
            ?today,
            ?selected,
            ?month_boundary,
            "laid out week row"
        );
        Ok(GridGeometry {
            cells,
            today,
            selected,
            month_boundary,
        })
    }

    /// Pixel offset of the left edge of column `i`; `edge(cell_count)` is the
    /// full width
    fn edge(&self, i: usize) -> u32 {
        let i = u64::try_from(i).unwrap_or(u64::MAX);
        let n = u64::try_from(self.cell_count).unwrap_or(u64::MAX);
        let x = i.saturating_mul(u64::from(self.pixel_width)) / n;
        u32::try_from(x).unwrap_or(self.pixel_width)
    }
}

fn classify(row: &WeekRow, today: Option<usize>, column: usize) -> DayClass {
    match row.week().cmp(&row.reference()) {
        Ordering::Less => DayClass::Past,
        Ordering::Greater => DayClass::Future,
        Ordering::Equal => match today.map(|t| column.cmp(&t)) {
            Some(Ordering::Less) => DayClass::Past,
            Some(Ordering::Equal) => DayClass::Present,
            Some(Ordering::Greater) | None => DayClass::Future,
        },
    }
}
