use crate::calendar::WeekIndex;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum CalendarError {
    #[error("a week index must be specified")]
    MissingWeek,
    #[error("a reference week index must be specified")]
    MissingReference,
    #[error("pixel width must be positive")]
    ZeroWidth,
    #[error("cell count must be positive")]
    ZeroCellCount,
    #[error("week row has {actual} days but the grid has {expected} cells")]
    RowLength { expected: usize, actual: usize },
    #[error("day-of-week ordinal {0} is not in the range 0 through 6")]
    InvalidWeekday(u8),
    #[error("week {0} lies outside the supported range of dates")]
    OutOfRange(WeekIndex),
}

impl CalendarError {
    /// Returns `true` if the error was caused by a malformed argument rather
    /// than by a week beyond the representable calendar
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, CalendarError::OutOfRange(_))
    }
}
