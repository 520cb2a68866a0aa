use crate::calendar::{
    GridGeometry, GridLayout, Point, WeekCalculator, WeekIndex, WeekRow, WeekStart,
};
use crate::error::CalendarError;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Weekday};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Default height of a week row in pixels
pub const DEFAULT_HEIGHT: u32 = 32;

/// Heights below this are raised to it
pub const MIN_HEIGHT: u32 = 10;

pub const DEFAULT_TEXT_SIZE: u16 = 10;

/// Default number of event lines shown under each day number
pub const DEFAULT_EVENT_ROWS: u16 = 5;

/// Everything needed to compute and lay out one week of a week view
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ViewParams {
    week: WeekIndex,
    reference_week: WeekIndex,
    week_start: WeekStart,
    selected_day: Option<Weekday>,
    today: Option<Date>,
    height: u32,
    text_size: u16,
    event_rows: u16,
}

impl ViewParams {
    pub fn new(week: WeekIndex, reference_week: WeekIndex) -> Self {
        ViewParams {
            week,
            reference_week,
            week_start: WeekStart::default(),
            selected_day: None,
            today: None,
            height: DEFAULT_HEIGHT,
            text_size: DEFAULT_TEXT_SIZE,
            event_rows: DEFAULT_EVENT_ROWS,
        }
    }

    /// Parses parameters from a TOML document.  `week` and `reference_week`
    /// are required; unrecognized keys are rejected.
    pub fn from_toml(s: &str) -> Result<Self, ParamsError> {
        let raw = toml::from_str::<RawViewParams>(s)?;
        Ok(ViewParams::try_from(raw)?)
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_selected_day(mut self, selected_day: Option<Weekday>) -> Self {
        self.selected_day = selected_day;
        self
    }

    pub fn with_today(mut self, today: Option<Date>) -> Self {
        self.today = today;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height.max(MIN_HEIGHT);
        self
    }

    pub fn with_text_size(mut self, text_size: u16) -> Self {
        self.text_size = text_size;
        self
    }

    pub fn with_event_rows(mut self, event_rows: u16) -> Self {
        self.event_rows = event_rows;
        self
    }

    pub fn week(&self) -> WeekIndex {
        self.week
    }

    pub fn reference_week(&self) -> WeekIndex {
        self.reference_week
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn selected_day(&self) -> Option<Weekday> {
        self.selected_day
    }

    pub fn today(&self) -> Option<Date> {
        self.today
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Text size of day numbers and event lines.  Only stored here; drawing
    /// is left to the caller.
    pub fn text_size(&self) -> u16 {
        self.text_size
    }

    /// Number of event lines shown under each day number.  Like
    /// [`ViewParams::text_size`], this is passed through for drawing.
    pub fn event_rows(&self) -> u16 {
        self.event_rows
    }

    pub fn calculator(&self) -> WeekCalculator {
        WeekCalculator::new(self.week_start)
    }

    pub fn week_row(&self) -> Result<WeekRow, CalendarError> {
        self.calculator().week_dates(self.week, self.reference_week)
    }

    pub fn grid_layout(&self, pixel_width: u32) -> GridLayout {
        GridLayout::new(pixel_width)
            .today(self.today)
            .selected(self.selected_day)
    }

    pub fn layout(&self, pixel_width: u32) -> Result<GridGeometry, CalendarError> {
        self.grid_layout(pixel_width).layout(&self.week_row()?)
    }

    /// Returns the month seam of `geometry` for a row of this view's height
    pub fn month_seam(&self, geometry: &GridGeometry) -> Option<Vec<Point>> {
        geometry.month_seam(self.height)
    }
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to parse view parameters")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] CalendarError),
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct RawViewParams {
    week: Option<WeekIndex>,
    reference_week: Option<WeekIndex>,
    week_start: WeekStart,
    selected_day: Option<u8>,
    #[serde(deserialize_with = "deserialize_ymd")]
    today: Option<Date>,
    height: Option<u32>,
    text_size: Option<u16>,
    event_rows: Option<u16>,
}

impl TryFrom<RawViewParams> for ViewParams {
    type Error = CalendarError;

    fn try_from(raw: RawViewParams) -> Result<ViewParams, CalendarError> {
        let week = raw.week.ok_or(CalendarError::MissingWeek)?;
        let reference_week = raw.reference_week.ok_or(CalendarError::MissingReference)?;
        let selected_day = raw.selected_day.map(weekday_from_ordinal).transpose()?;
        Ok(ViewParams::new(week, reference_week)
            .with_week_start(raw.week_start)
            .with_selected_day(selected_day)
            .with_today(raw.today)
            .with_height(raw.height.unwrap_or(DEFAULT_HEIGHT))
            .with_text_size(raw.text_size.unwrap_or(DEFAULT_TEXT_SIZE))
            .with_event_rows(raw.event_rows.unwrap_or(DEFAULT_EVENT_ROWS)))
    }
}

fn deserialize_ymd<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| Date::parse(&s, &YMD_FMT).map_err(serde::de::Error::custom))
        .transpose()
}

/// Converts a number of days from Sunday (0 through 6) to a `Weekday`
pub fn weekday_from_ordinal(ordinal: u8) -> Result<Weekday, CalendarError> {
    if ordinal < 7 {
        Ok(Weekday::Sunday.nth_next(ordinal))
    } else {
        Err(CalendarError::InvalidWeekday(ordinal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayClass;
    use time::macros::date;

    #[test]
    fn test_from_toml() {
        let params = ViewParams::from_toml(concat!(
            "week = 2878\n",
            "reference_week = 2878\n",
            "week_start = \"monday\"\n",
            "selected_day = 3\n",
            "today = \"2025-03-06\"\n",
            "height = 250\n",
            "text_size = 12\n",
            "event_rows = 4\n",
        ))
        .unwrap();
        assert_eq!(
            params,
            ViewParams::new(2878, 2878)
                .with_week_start(WeekStart::Monday)
                .with_selected_day(Some(Weekday::Wednesday))
                .with_today(Some(date!(2025 - 03 - 06)))
                .with_height(250)
                .with_text_size(12)
                .with_event_rows(4)
        );
    }

    #[test]
    fn test_defaults() {
        let params = ViewParams::from_toml("week = 5\nreference_week = 7\n").unwrap();
        assert_eq!(params.week_start(), WeekStart::Sunday);
        assert_eq!(params.selected_day(), None);
        assert_eq!(params.today(), None);
        assert_eq!(params.height(), DEFAULT_HEIGHT);
        assert_eq!(params.text_size(), DEFAULT_TEXT_SIZE);
        assert_eq!(params.event_rows(), DEFAULT_EVENT_ROWS);
    }

    #[test]
    fn test_missing_week() {
        let r = ViewParams::from_toml("reference_week = 7\n");
        assert!(matches!(
            r,
            Err(ParamsError::Invalid(CalendarError::MissingWeek))
        ));
        let r = ViewParams::from_toml("week = 7\n");
        assert!(matches!(
            r,
            Err(ParamsError::Invalid(CalendarError::MissingReference))
        ));
    }

    #[test]
    fn test_unknown_field() {
        let r = ViewParams::from_toml("week = 1\nreference_week = 1\nfocus_month = 3\n");
        assert!(matches!(r, Err(ParamsError::Parse(_))));
    }

    #[test]
    fn test_bad_selected_day() {
        let r = ViewParams::from_toml("week = 1\nreference_week = 1\nselected_day = 7\n");
        assert!(matches!(
            r,
            Err(ParamsError::Invalid(CalendarError::InvalidWeekday(7)))
        ));
    }

    #[test]
    fn test_bad_today() {
        let r = ViewParams::from_toml("week = 1\nreference_week = 1\ntoday = \"2025-02-30\"\n");
        assert!(matches!(r, Err(ParamsError::Parse(_))));
    }

    #[test]
    fn test_week_start_spellings() {
        for spelling in ["monday", "Monday", "MON", "mon"] {
            let src = format!("week = 1\nreference_week = 1\nweek_start = \"{spelling}\"\n");
            let params = ViewParams::from_toml(&src).unwrap();
            assert_eq!(params.week_start(), WeekStart::Monday, "{spelling}");
        }
        let r = ViewParams::from_toml("week = 1\nreference_week = 1\nweek_start = \"friday\"\n");
        assert!(matches!(r, Err(ParamsError::Parse(_))));
    }

    #[test]
    fn test_height_clamped() {
        assert_eq!(ViewParams::new(0, 0).with_height(3).height(), MIN_HEIGHT);
        assert_eq!(ViewParams::new(0, 0).with_height(250).height(), 250);
    }

    #[test]
    fn test_weekday_from_ordinal() {
        assert_eq!(weekday_from_ordinal(0), Ok(Weekday::Sunday));
        assert_eq!(weekday_from_ordinal(1), Ok(Weekday::Monday));
        assert_eq!(weekday_from_ordinal(6), Ok(Weekday::Saturday));
        assert_eq!(
            weekday_from_ordinal(9),
            Err(CalendarError::InvalidWeekday(9))
        );
    }

    #[test]
    fn test_layout() {
        let today = date!(2017 - 08 - 03);
        let calc = WeekCalculator::new(WeekStart::Monday);
        let week = calc.current_week_index(today);
        let geom = ViewParams::new(week, week)
            .with_week_start(WeekStart::Monday)
            .with_today(Some(today))
            .with_selected_day(Some(Weekday::Monday))
            .layout(700)
            .unwrap();
        assert_eq!(geom.today(), Some(3));
        assert_eq!(geom.selected(), Some(0));
        assert_eq!(geom.month_boundary().map(|b| b.column), Some(1));
        assert_eq!(geom.cell(2).map(|c| c.class), Some(DayClass::Past));
        assert_eq!(geom.cell(3).map(|c| c.class), Some(DayClass::Present));
    }

    #[test]
    fn test_month_seam_uses_height() {
        let today = date!(2017 - 08 - 03);
        let week = WeekCalculator::new(WeekStart::Monday).current_week_index(today);
        let params = ViewParams::new(week, week)
            .with_week_start(WeekStart::Monday)
            .with_height(250);
        let geom = params.layout(700).unwrap();
        let seam = params.month_seam(&geom).unwrap();
        assert_eq!(seam.first(), Some(&Point { x: 0, y: 250 }));
        assert_eq!(seam.last(), Some(&Point { x: 700, y: 0 }));
        assert_eq!(seam, geom.month_seam(250).unwrap());
        let clamped = ViewParams::new(week, week)
            .with_week_start(WeekStart::Monday)
            .with_height(1);
        assert_eq!(clamped.month_seam(&geom), geom.month_seam(MIN_HEIGHT));
        let no_month = ViewParams::new(week + 1, week).with_week_start(WeekStart::Monday);
        assert_eq!(no_month.month_seam(&no_month.layout(700).unwrap()), None);
    }
}
