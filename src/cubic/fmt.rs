//! Text forms of calendar dates and the printed month grid.

use std::fmt::{self, Display};

use chrono::{DateTime, TimeZone, Utc};

use super::{Block, Calendar, CalendarDate, DAYS_PER_WEEK, Day, Month, YearGrid};
use crate::astro::Ephemeris;
use crate::date::Weekday;
use crate::error::CalendarError;

/// Width of the printed grid, borders included.
pub const GRID_WIDTH: usize = 1 + (CELL_WIDTH + 1) * DAYS_PER_WEEK as usize;
const CELL_WIDTH: usize = 5;

/// Format of instants shown to the user.
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// English ordinal of `n`.
///
/// # Example
///
/// ```
/// use cubic_calendar::cubic::fmt;
///
/// assert_eq!("1st", fmt::ordinal(1));
/// assert_eq!("12th", fmt::ordinal(12));
/// assert_eq!("23rd", fmt::ordinal(23));
/// ```
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Compact form `DD/M/Season/YY`, with `H` for the holiday.
///
/// ```
/// use cubic_calendar::cubic::{CalendarDate, Month, Season, fmt};
/// use cubic_calendar::Weekday;
///
/// let date = CalendarDate {
///     year: 1,
///     season: Season::Spring,
///     month: Month::Early,
///     week: 1,
///     weekday: Weekday::Sunday,
/// };
/// assert_eq!("01/1/Spring/01", fmt::short(&date));
/// ```
pub fn short(date: &CalendarDate) -> String {
    let month = match date.month.number() {
        Some(n) => n.to_string(),
        None => "H".to_owned(),
    };
    format!(
        "{:02}/{}/{}/{:02}",
        date.day_of_month(),
        month,
        date.season,
        date.year
    )
}

/// `instant` in `tz`, as `DD/MM/YYYY HH:MM`.
pub fn time<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format(TIME_FORMAT).to_string()
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.month {
            Month::Early => "Early",
            Month::Mid => "Mid",
            Month::Late => "Late",
            Month::Holiday => return write!(f, "{} Holiday", self.season.holiday_name()),
        };
        write!(f, "{prefix} {}", self.season)
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let article = if self.month.is_holiday() { "the " } else { "" };
        write!(
            f,
            "{} the {} of {article}{}, Year {}",
            self.weekday,
            ordinal(self.day_of_month()),
            self.block(),
            self.year
        )
    }
}

fn centred(out: &mut String, text: &str) {
    let line = format!("{text:^GRID_WIDTH$}");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn rule(out: &mut String) {
    out.push_str(&"-".repeat(GRID_WIDTH));
    out.push('\n');
}

fn cell(day: &Day, highlighted: bool) -> String {
    let marker = if day.solar_event.is_some() { '*' } else { ' ' };
    let n = day.date.day_of_month();
    if highlighted {
        format!("{marker}[{n:>2}]")
    } else {
        format!(" {marker}{n:>2} ")
    }
}

/// Grid of `block` in `grid`, one row per week.
///
/// Days on which an equinox or solstice falls are marked with `*`;
/// `highlight`, if it is in the block, is bracketed.
pub fn block(grid: &YearGrid, block: Block, highlight: Option<&Day>) -> String {
    let mut out = String::new();
    if block.opens_year() {
        out.push('\n');
        centred(&mut out, &format!("* Year {} *", grid.year()));
        out.push('\n');
    }
    centred(&mut out, &format!("- {block} -"));
    rule(&mut out);
    out.push('|');
    for weekday in Weekday::ALL {
        out.push_str(&format!("{:^CELL_WIDTH$}|", weekday.abbrev()));
    }
    out.push('\n');
    rule(&mut out);

    let days: Vec<Day> = grid.block_days(block).collect();
    for week in days.chunks(DAYS_PER_WEEK as usize) {
        out.push('|');
        for day in week {
            let highlighted = highlight.is_some_and(|h| h.days_since_epoch == day.days_since_epoch);
            out.push_str(&cell(day, highlighted));
            out.push('|');
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Grids of `count` consecutive blocks starting at `start` of `year`,
/// crossing into the following years as needed.
pub fn blocks<E: Ephemeris>(
    calendar: &Calendar<E>,
    year: u32,
    start: Block,
    count: usize,
    highlight: Option<&Day>,
) -> Result<String, CalendarError> {
    let mut out = String::new();
    let mut grid = calendar.year(year)?;
    let mut current = start;
    for i in 0..count {
        if i > 0 && current.opens_year() {
            grid = calendar.year(grid.year() + 1)?;
        }
        out.push_str(&block(&grid, current, highlight));
        current = current.next();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::Location;
    use crate::cubic::Season;

    fn date(season: Season, month: Month, week: u32, weekday: Weekday) -> CalendarDate {
        CalendarDate {
            year: 1,
            season,
            month,
            week,
            weekday,
        }
    }

    #[test]
    fn test_ordinal() {
        for (std, n) in [
            ("1st", 1),
            ("2nd", 2),
            ("3rd", 3),
            ("4th", 4),
            ("11th", 11),
            ("12th", 12),
            ("13th", 13),
            ("21st", 21),
            ("28th", 28),
            ("111th", 111),
        ] {
            assert_eq!(std, ordinal(n));
        }
    }

    #[test]
    fn long_form() {
        let first = date(Season::Spring, Month::Early, 1, Weekday::Sunday);
        assert_eq!("Sunday the 1st of Early Spring, Year 1", first.to_string());

        let last = date(Season::Winter, Month::Holiday, 2, Weekday::Saturday);
        assert_eq!(
            "Saturday the 14th of the Vernal Equinox Holiday, Year 1",
            last.to_string()
        );

        let mid = date(Season::Autumn, Month::Mid, 3, Weekday::Tuesday);
        assert_eq!("Tuesday the 17th of Mid Autumn, Year 1", mid.to_string());
    }

    #[test]
    fn short_form() {
        let holiday = date(Season::Summer, Month::Holiday, 1, Weekday::Friday);
        assert_eq!("06/H/Summer/01", short(&holiday));
        let late = date(Season::Winter, Month::Late, 4, Weekday::Saturday);
        assert_eq!("28/3/Winter/01", short(&late));
    }

    #[test]
    fn block_names() {
        let block = Block {
            season: Season::Summer,
            month: Month::Holiday,
        };
        assert_eq!("Autumnal Equinox Holiday", block.to_string());
        assert_eq!("Early Autumn", block.next().to_string());
    }

    #[test]
    fn time_in_zone() {
        let instant = DateTime::parse_from_rfc3339("2024-09-22T12:43:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!("22/09/2024 12:43", time(&instant, &Utc));
        assert_eq!("22/09/2024 22:43", time(&instant, &chrono_tz::Australia::Sydney));
    }

    #[test]
    fn first_block_of_year_one() {
        let calendar = Calendar::new(Location::SYDNEY);
        let grid = calendar.year(1).unwrap();
        let today = grid.days().nth(9).unwrap();
        let early_spring = Block {
            season: Season::Spring,
            month: Month::Early,
        };
        let text = block(&grid, early_spring, Some(&today));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!("", lines[0]);
        assert_eq!("                * Year 1 *", lines[1]);
        assert_eq!("", lines[2]);
        assert_eq!("             - Early Spring -", lines[3]);
        assert_eq!("-".repeat(GRID_WIDTH), lines[4]);
        assert_eq!("| Sun | Mon | Tue | Wed | Thu | Fri | Sat |", lines[5]);
        // The September equinox falls on the evening of the first day.
        assert_eq!("|  *1 |   2 |   3 |   4 |   5 |   6 |   7 |", lines[7]);
        assert_eq!("|   8 |   9 | [10]|  11 |  12 |  13 |  14 |", lines[8]);
        assert_eq!(12, lines.len());
        assert!(lines[4..11].iter().all(|l| l.len() == GRID_WIDTH));
        assert_eq!("", lines[11]);
    }

    #[test]
    fn leap_holiday_block() {
        let calendar = Calendar::new(Location::SYDNEY);
        let grid = calendar.year(1).unwrap();
        let holiday = Block {
            season: Season::Winter,
            month: Month::Holiday,
        };
        let text = block(&grid, holiday, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!("        - Vernal Equinox Holiday -", lines[0]);
        assert_eq!("|   1 |   2 |   3 |   4 |   5 |   6 |   7 |", lines[4]);
        // 2025-09-22 is the ninth day, a Monday.
        assert_eq!("|   8 |  *9 |  10 |  11 |  12 |  13 |  14 |", lines[5]);
    }

    #[test]
    fn blocks_cross_years() {
        let calendar = Calendar::new(Location::SYDNEY);
        let start = Block {
            season: Season::Winter,
            month: Month::Holiday,
        };
        let text = blocks(&calendar, 1, start, 2, None).unwrap();
        assert!(text.contains("- Vernal Equinox Holiday -"));
        assert!(text.contains("* Year 2 *"));
        assert!(text.contains("- Early Spring -"));
    }
}
