//! Calendar facts for week-by-week calendar views.
//!
//! [`WeekCalculator`] turns dates into week indices counted from the
//! 1970-01-01 epoch and week indices back into rows of seven dates.
//! [`GridLayout`] lays such a row out across a pixel width, locating today,
//! the selected day, and the seam at which a new month begins.
//! [`ViewParams`] bundles the inputs a week view needs.
pub mod calendar;
mod error;
pub mod params;
pub use crate::calendar::{
    GridGeometry, GridLayout, WeekCalculator, WeekIndex, WeekRow, WeekStart,
};
pub use crate::error::CalendarError;
pub use crate::params::{ParamsError, ViewParams};
