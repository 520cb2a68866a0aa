use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weekgrid::calendar::{DayClass, WeekWindow};
use weekgrid::params::weekday_from_ordinal;
use weekgrid::{GridGeometry, GridLayout, ViewParams, WeekCalculator, WeekRow, WeekStart};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

const DEFAULT_WIDTH: u32 = 700;

const DEFAULT_WEEKS: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Width of each day's cell in the printed row, including its brackets
const CELL_WIDTH: usize = 7;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    date: Option<Date>,
    week_start: WeekStart,
    width: u32,
    weeks: NonZeroUsize,
    select: Option<u8>,
    params: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            date: None,
            week_start: WeekStart::Sunday,
            width: DEFAULT_WIDTH,
            weeks: DEFAULT_WEEKS,
            select: None,
            params: None,
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('m') | Arg::Long("monday") => opts.week_start = WeekStart::Monday,
                Arg::Long("week-start") => opts.week_start = parser.value()?.parse()?,
                Arg::Short('w') | Arg::Long("width") => opts.width = parser.value()?.parse()?,
                Arg::Short('n') | Arg::Long("weeks") => opts.weeks = parser.value()?.parse()?,
                Arg::Short('s') | Arg::Long("select") => {
                    opts.select = Some(parser.value()?.parse()?);
                }
                Arg::Short('p') | Arg::Long("params") => {
                    opts.params = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if opts.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                for line in opts.render(today)? {
                    println!("{line}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: weekgrid [options] [YYYY-MM-DD]");
                println!();
                println!("Print week rows of a calendar grid with their pixel layout");
                println!();
                println!("Options:");
                println!("  -m, --monday         Start weeks on Monday instead of Sunday");
                println!("      --week-start <DAY>");
                println!("                       Start weeks on \"sunday\" or \"monday\"");
                println!("  -w, --width <PX>     Pixel width to lay each week out across [default: 700]");
                println!("  -n, --weeks <N>      Number of weeks to print [default: 5]");
                println!("  -s, --select <0-6>   Day of week to select (0 = Sunday)");
                println!("  -p, --params <FILE>  Lay out the single week described by a TOML file");
                println!("  -h, --help           Display this help message and exit");
                println!("  -V, --version        Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    fn render(&self, today: Date) -> anyhow::Result<Vec<String>> {
        if let Some(path) = &self.params {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let params = ViewParams::from_toml(&src)
                .with_context(|| format!("invalid view parameters in {}", path.display()))?;
            let row = params.week_row()?;
            let geom = params.layout(self.width)?;
            return Ok(vec![header(params.week_start()), show_row(&row, &geom)]);
        }
        let calculator = WeekCalculator::new(self.week_start);
        let date = self.date.unwrap_or(today);
        let selected = match self.select {
            Some(ordinal) => weekday_from_ordinal(ordinal)?,
            None => date.weekday(),
        };
        let reference = calculator.current_week_index(today);
        let center = calculator.current_week_index(date);
        tracing::debug!(%today, %date, reference, center, "printing weeks");
        let window = WeekWindow::around(calculator, center, reference, self.weeks)?;
        let mut lines = vec![header(self.week_start)];
        for row in window.rows() {
            let geom = GridLayout::new(self.width)
                .today(Some(today))
                .selected((row.week() == center).then_some(selected))
                .layout(row)?;
            lines.push(show_row(row, &geom));
        }
        Ok(lines)
    }
}

fn header(week_start: WeekStart) -> String {
    let names = (0..7)
        .map(|i| {
            let name = week_start.weekday().nth_next(i).to_string();
            format!("{:^width$}", name.get(..2).unwrap_or(&name), width = CELL_WIDTH)
        })
        .collect::<Vec<_>>()
        .concat();
    format!("{:>8}{names}", "week")
}

fn show_row(row: &WeekRow, geom: &GridGeometry) -> String {
    let cells = geom
        .cells()
        .iter()
        .map(|cell| {
            let (open, close) = match cell.class {
                DayClass::Past => ('(', ')'),
                DayClass::Present => ('[', ']'),
                DayClass::Future => (' ', ' '),
            };
            format!("{open}{:>5}{close}", cell.label)
        })
        .collect::<Vec<_>>()
        .concat();
    let mut notes = Vec::new();
    if let Some(b) = geom.today_bounds() {
        notes.push(format!("today {}..{}", b.left, b.right));
    }
    if let Some(b) = geom.selected_bounds() {
        notes.push(format!("selected {}..{}", b.left, b.right));
    }
    if let Some(month) = geom
        .month_boundary()
        .and_then(|b| row.get(b.column))
        .map(Date::month)
    {
        notes.push(format!("{month} begins"));
    }
    let line = format!("{:>8}{cells}  {}", row.week(), notes.join(", "));
    line.trim_end().to_owned()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weekgrid=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    Command::from_parser(Parser::from_env())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("weekgrid").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(RunOptions::default()));
    }

    #[test]
    fn test_parse_options() {
        let cmd = parse(&["-m", "--width", "350", "-n", "3", "-s", "2", "2017-08-03"]).unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunOptions {
                date: Some(date!(2017 - 08 - 03)),
                week_start: WeekStart::Monday,
                width: 350,
                weeks: NonZeroUsize::new(3).unwrap(),
                select: Some(2),
                params: None,
            })
        );
    }

    #[test]
    fn test_parse_week_start() {
        let Command::Run(opts) = parse(&["--week-start", "monday"]).unwrap() else {
            panic!("expected a run command");
        };
        assert_eq!(opts.week_start, WeekStart::Monday);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["not-a-date"]).is_err());
        assert!(parse(&["2017-08-03", "2017-08-04"]).is_err());
        assert!(parse(&["--weeks", "0"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--week-start", "friday"]).is_err());
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header(WeekStart::Monday),
            "    week  Mo     Tu     We     Th     Fr     Sa     Su   "
        );
    }

    #[test]
    fn test_render() {
        let opts = RunOptions {
            date: None,
            week_start: WeekStart::Monday,
            width: 700,
            weeks: NonZeroUsize::new(3).unwrap(),
            select: None,
            params: None,
        };
        let lines = opts.render(date!(2017 - 08 - 03)).unwrap();
        assert_eq!(
            lines,
            [
                "    week  Mo     Tu     We     Th     Fr     Sa     Su   ",
                "    2482(   24)(   25)(   26)(   27)(   28)(   29)(   30)",
                "    2483(   31)(Aug 1)(    2)[    3]     4      5      6   today 300..400, selected 300..400, August begins",
                "    2484     7      8      9     10     11     12     13",
            ]
        );
    }
}
