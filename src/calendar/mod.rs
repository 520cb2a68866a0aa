mod grid;
mod util;
mod weeks;
mod window;
pub use self::grid::{
    Cell, ColumnBounds, DayClass, Edge, GridGeometry, GridLayout, MonthBoundary, Point,
};
pub use self::util::{
    day_label, julian_day, ParseWeekStartError, WeekStart, EPOCH_JULIAN_DAY,
};
pub use self::weeks::{WeekCalculator, WeekIndex, WeekRow};
pub use self::window::WeekWindow;
