//! Cubic seasonal calendar.
//!
//! A year has four seasons, each opened on a Sunday and closed by an
//! equinox or solstice. A season is three months of four weeks followed by
//! a holiday of one week, or two when the closing event falls late: if the
//! event happens after sunset on the Monday following the first holiday
//! week, a leap week is inserted. Every day runs from local sunrise to the
//! next sunrise.
//!
//! Year 1 starts at sunrise of the [`Epoch`], a Sunday near the spring
//! equinox of the observer's hemisphere.
//!
//! # Example
//!
//! ```
//! use cubic_calendar::Date;
//! use cubic_calendar::astro::Location;
//! use cubic_calendar::cubic::{Calendar, Month, Season};
//!
//! let calendar = Calendar::new(Location::SYDNEY);
//! let day = calendar
//!     .day_at(Date::from_gregorian(2024, 12, 15).unwrap())
//!     .unwrap();
//!
//! assert_eq!((1, Season::Spring, Month::Holiday, 1), (
//!     day.date.year,
//!     day.date.season,
//!     day.date.month,
//!     day.date.week,
//! ));
//! assert_eq!("Sunday the 1st of the Summer Solstice Holiday, Year 1", day.date.to_string());
//! ```

use std::fmt as std_fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::astro::{Ephemeris, Hemisphere, Location, Meeus, SolarEvent, SolarEventKind};
use crate::date::{Date, Weekday};
use crate::error::CalendarError;
use crate::time_scales::Ut;

pub mod fmt;

pub const DAYS_PER_WEEK: u32 = 7;
pub const WEEKS_PER_MONTH: u32 = 4;
pub const MONTHS_PER_SEASON: u32 = 3;
pub const DAYS_PER_MONTH: u32 = DAYS_PER_WEEK * WEEKS_PER_MONTH;
/// Days before the holiday starts.
pub const WORKING_DAYS: u32 = DAYS_PER_MONTH * MONTHS_PER_SEASON;
/// Holiday weeks of a season, without and with a leap week.
pub const MAX_HOLIDAY_WEEKS: u32 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn next(&self) -> Self {
        Self::ALL[(*self as usize + 1) % 4]
    }
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
    /// Name of the holiday ending this season, after the event closing it.
    pub fn holiday_name(&self) -> &'static str {
        match self {
            Season::Spring => "Summer Solstice",
            Season::Summer => "Autumnal Equinox",
            Season::Autumn => "Winter Solstice",
            Season::Winter => "Vernal Equinox",
        }
    }
    /// The equinox or solstice opening this season in `hemisphere`.
    pub fn opening_event(&self, hemisphere: Hemisphere) -> SolarEventKind {
        let opening = SolarEventKind::spring_equinox(hemisphere) as usize;
        SolarEventKind::ALL[(opening + *self as usize) % 4]
    }
    /// The equinox or solstice closing this season in `hemisphere`.
    ///
    /// ```
    /// use cubic_calendar::astro::{Hemisphere, SolarEventKind};
    /// use cubic_calendar::cubic::Season;
    ///
    /// assert_eq!(SolarEventKind::DecemberSolstice, Season::Spring.closing_event(Hemisphere::Southern));
    /// assert_eq!(SolarEventKind::JuneSolstice, Season::Spring.closing_event(Hemisphere::Northern));
    /// ```
    pub fn closing_event(&self, hemisphere: Hemisphere) -> SolarEventKind {
        let opening = SolarEventKind::spring_equinox(hemisphere) as usize;
        SolarEventKind::ALL[(opening + *self as usize + 1) % 4]
    }
}

impl std_fmt::Display for Season {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.write_str(self.name())
    }
}

/// Month of a season, or its holiday.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Month {
    Early,
    Mid,
    Late,
    Holiday,
}

impl Month {
    pub const ALL: [Month; 4] = [Month::Early, Month::Mid, Month::Late, Month::Holiday];

    /// `1..=3` for working months, `None` for the holiday.
    pub fn number(&self) -> Option<u32> {
        match self {
            Month::Holiday => None,
            month => Some(*month as u32 + 1),
        }
    }
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1..=MONTHS_PER_SEASON => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }
    pub fn is_holiday(&self) -> bool {
        matches!(self, Month::Holiday)
    }
}

/// Unit of the printed calendar: one month, or one season's holiday.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Block {
    pub season: Season,
    pub month: Month,
}

impl Block {
    pub fn next(&self) -> Self {
        match self.month {
            Month::Holiday => Block {
                season: self.season.next(),
                month: Month::Early,
            },
            month => Block {
                season: self.season,
                month: Month::ALL[month as usize + 1],
            },
        }
    }
    /// Whether the block is the first one of a year.
    pub fn opens_year(&self) -> bool {
        self.season == Season::Spring && self.month == Month::Early
    }
}

/// A date of the cubic calendar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CalendarDate {
    /// Counted from 1.
    pub year: u32,
    pub season: Season,
    pub month: Month,
    /// `1..=4` in working months, `1..=2` in the holiday.
    pub week: u32,
    pub weekday: Weekday,
}

impl CalendarDate {
    /// Day number within the month or holiday, counted from 1.
    pub fn day_of_month(&self) -> u32 {
        (self.week - 1) * DAYS_PER_WEEK + self.weekday.index() + 1
    }
    pub fn block(&self) -> Block {
        Block {
            season: self.season,
            month: self.month,
        }
    }
    /// Days from the start of the season, `None` if week is out of range.
    fn season_offset(&self) -> Option<u32> {
        let weeks = match self.month {
            Month::Holiday => MAX_HOLIDAY_WEEKS,
            _ => WEEKS_PER_MONTH,
        };
        if !(1..=weeks).contains(&self.week) {
            return None;
        }
        let month_start = match self.month.number() {
            Some(n) => (n - 1) * DAYS_PER_MONTH,
            None => WORKING_DAYS,
        };
        Some(month_start + self.day_of_month() - 1)
    }
}

/// First day of the calendar, always a Sunday.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Epoch {
    date: Date,
}

impl Epoch {
    /// 2024-09-22, the first Sunday of the 2024 southern spring.
    const SOUTHERN_JDN: u32 = 2460576;
    /// 2025-03-23, the first Sunday of the 2025 northern spring.
    const NORTHERN_JDN: u32 = 2460758;

    pub fn new(date: Date) -> Result<Self, CalendarError> {
        if date.weekday() != Weekday::Sunday {
            return Err(CalendarError::InvalidEpoch {
                date,
                reason: "not a Sunday",
            });
        }
        Ok(Self { date })
    }

    /// The default epoch of `hemisphere`.
    ///
    /// ```
    /// use cubic_calendar::astro::Hemisphere;
    /// use cubic_calendar::cubic::Epoch;
    ///
    /// assert_eq!("2024-09-22", Epoch::canonical(Hemisphere::Southern).date().iso_gregorian());
    /// assert_eq!("2025-03-23", Epoch::canonical(Hemisphere::Northern).date().iso_gregorian());
    /// ```
    pub fn canonical(hemisphere: Hemisphere) -> Self {
        let jdn = match hemisphere {
            Hemisphere::Southern => Self::SOUTHERN_JDN,
            Hemisphere::Northern => Self::NORTHERN_JDN,
        };
        Self {
            date: Date::from_jdn(jdn),
        }
    }

    /// The first Sunday on or after the (UTC) date of the spring equinox of
    /// `hemisphere` in Gregorian `year`.
    pub fn after_spring_equinox<E: Ephemeris>(
        hemisphere: Hemisphere,
        year: i32,
        ephemeris: &E,
    ) -> Result<Self, CalendarError> {
        let kind = SolarEventKind::spring_equinox(hemisphere);
        let event = ephemeris.solar_event(year, kind)?;
        let date = Ut::from(event.time).date_in_timezone(0);
        let days_to_sunday = (DAYS_PER_WEEK - date.weekday().index()) % DAYS_PER_WEEK;
        Self::new(date + days_to_sunday as i32)
    }

    pub fn date(&self) -> Date {
        self.date
    }
}

/// Layout of one season: where it starts, the event closing it, and
/// whether it carries a leap week.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SeasonLayout {
    pub year: u32,
    pub season: Season,
    /// Days since the epoch of the season's first day.
    pub first_day: u32,
    /// Local civil date of the first day.
    pub start: Date,
    /// The event closing the season before, usually falling on one of this
    /// season's first days.
    pub opening_event: SolarEvent,
    /// Days since the epoch of the day on which the opening event falls.
    pub opening_event_day: i64,
    pub closing_event: SolarEvent,
    /// Days since the epoch of the day on which the closing event falls.
    pub closing_event_day: i64,
    /// Sunset of the Monday after the first holiday week.
    pub threshold: DateTime<Utc>,
    /// 1, or 2 with a leap week.
    pub holiday_weeks: u32,
}

impl SeasonLayout {
    pub fn has_leap_week(&self) -> bool {
        self.holiday_weeks > 1
    }
    pub fn len_days(&self) -> u32 {
        WORKING_DAYS + self.holiday_weeks * DAYS_PER_WEEK
    }
    /// Days since the epoch of the first day of the next season.
    pub fn end_day(&self) -> u32 {
        self.first_day + self.len_days()
    }
    pub fn contains(&self, day: u32) -> bool {
        (self.first_day..self.end_day()).contains(&day)
    }
    /// Local civil date of the first holiday day.
    pub fn holiday_start(&self) -> Date {
        self.start + WORKING_DAYS as i32
    }

    fn next_start(&self) -> SeasonStart {
        let year = match self.season {
            Season::Winter => self.year + 1,
            _ => self.year,
        };
        SeasonStart {
            year,
            season: self.season.next(),
            first_day: self.end_day(),
            opening: Some((self.closing_event, self.closing_event_day)),
        }
    }

    /// The calendar date `offset` days into the season.
    fn date_at(&self, offset: u32) -> CalendarDate {
        let (month, week) = if offset < WORKING_DAYS {
            (
                Month::ALL[(offset / DAYS_PER_MONTH) as usize],
                offset % DAYS_PER_MONTH / DAYS_PER_WEEK + 1,
            )
        } else {
            (Month::Holiday, (offset - WORKING_DAYS) / DAYS_PER_WEEK + 1)
        };
        CalendarDate {
            year: self.year,
            season: self.season,
            month,
            week,
            weekday: Weekday::from_index(offset),
        }
    }

    /// The day at `day` days since the epoch, which must be in this season.
    fn day(&self, day: u32) -> Day {
        debug_assert!(self.contains(day));
        let offset = day - self.first_day;
        let solar_event = [
            (self.opening_event_day, self.opening_event),
            (self.closing_event_day, self.closing_event),
        ]
        .into_iter()
        .find(|&(event_day, _)| event_day == day as i64)
        .map(|(_, event)| event);
        Day {
            date: self.date_at(offset),
            gregorian: self.start + offset as i32,
            days_since_epoch: day,
            solar_event,
        }
    }
}

/// A day of the calendar with its Gregorian counterpart.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Day {
    pub date: CalendarDate,
    /// Local civil date on which the day begins at sunrise.
    pub gregorian: Date,
    pub days_since_epoch: u32,
    /// Equinox or solstice happening during the day.
    pub solar_event: Option<SolarEvent>,
}

impl Day {
    /// Whether the day is in the second, inserted, holiday week.
    pub fn is_leap_week(&self) -> bool {
        self.date.month.is_holiday() && self.date.week == MAX_HOLIDAY_WEEKS
    }
}

/// The calendar as seen from one location.
#[derive(Debug, Clone)]
pub struct Calendar<E = Meeus> {
    location: Location,
    epoch: Epoch,
    ephemeris: E,
}

impl Calendar<Meeus> {
    /// Calendar at `location` with the default epoch of its hemisphere.
    pub fn new(location: Location) -> Self {
        let epoch = Epoch::canonical(location.hemisphere());
        Self::with_epoch(location, epoch, Meeus)
    }
}

impl Default for Calendar<Meeus> {
    fn default() -> Self {
        Self::new(Location::default())
    }
}

impl<E: Ephemeris> Calendar<E> {
    pub fn with_epoch(location: Location, epoch: Epoch, ephemeris: E) -> Self {
        Self {
            location,
            epoch,
            ephemeris,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Start (sunrise) and end (next sunrise) of the day beginning on the
    /// local civil date `date`.
    pub fn day_bounds(&self, date: Date) -> Result<(DateTime<Utc>, DateTime<Utc>), CalendarError> {
        let start = self.ephemeris.sun_times(date, &self.location)?.sunrise;
        let end = self.ephemeris.sun_times(date + 1, &self.location)?.sunrise;
        Ok((start, end))
    }

    /// Local civil date of the day containing `time`, i.e. the date of the
    /// last sunrise at or before `time`.
    pub fn local_date(&self, time: DateTime<Utc>) -> Result<Date, CalendarError> {
        let guess = Ut::from(time).date_in_timezone(self.location.mean_solar_offset_minutes());
        let (start, end) = self.day_bounds(guess)?;
        Ok(if time < start {
            guess + -1
        } else if time >= end {
            guess + 1
        } else {
            guess
        })
    }

    /// Lays out the seasons from the epoch onwards.
    ///
    /// The iterator is unbounded; it yields an error and then stops if the
    /// ephemeris cannot provide what a season needs.
    pub fn seasons(&self) -> Seasons<'_, E> {
        Seasons {
            calendar: self,
            next: Some(SeasonStart {
                year: 1,
                season: Season::Spring,
                first_day: 0,
                opening: None,
            }),
        }
    }

    fn layout(&self, next: SeasonStart) -> Result<SeasonLayout, CalendarError> {
        let SeasonStart {
            year,
            season,
            first_day,
            opening,
        } = next;
        let hemisphere = self.location.hemisphere();
        let start = self.epoch.date + first_day as i32;
        let (opening_event, opening_event_day) = match opening {
            Some(opening) => opening,
            None => {
                let event = self.nearest_event(season.opening_event(hemisphere), start)?;
                (event, self.day_index(event.time)?)
            }
        };

        let holiday_start = start + WORKING_DAYS as i32;
        let closing_event = self.nearest_event(season.closing_event(hemisphere), holiday_start)?;

        // Monday of what would be the next season's first week.
        let monday = holiday_start + (DAYS_PER_WEEK + 1) as i32;
        let threshold = self.ephemeris.sun_times(monday, &self.location)?.sunset;
        let mut holiday_weeks = 1;
        if closing_event.time > threshold {
            let next_monday = monday + DAYS_PER_WEEK as i32;
            let last_threshold = self.ephemeris.sun_times(next_monday, &self.location)?.sunset;
            if closing_event.time > last_threshold {
                return Err(CalendarError::LeapWeekOverflow {
                    year,
                    season,
                    event: closing_event.time,
                    threshold: last_threshold,
                });
            }
            holiday_weeks = MAX_HOLIDAY_WEEKS;
            debug!(
                year,
                %season,
                event = %closing_event.time,
                %threshold,
                "leap week inserted"
            );
        }

        let layout = SeasonLayout {
            year,
            season,
            first_day,
            start,
            opening_event,
            opening_event_day,
            closing_event,
            closing_event_day: self.day_index(closing_event.time)?,
            threshold,
            holiday_weeks,
        };
        trace!(year, %season, start = %start, holiday_weeks, "season laid out");
        Ok(layout)
    }

    /// Days since the epoch of the day containing `time`, negative before it.
    fn day_index(&self, time: DateTime<Utc>) -> Result<i64, CalendarError> {
        Ok((self.local_date(time)? - self.epoch.date) as i64)
    }

    /// The event of `kind` closest to `date`.
    fn nearest_event(&self, kind: SolarEventKind, date: Date) -> Result<SolarEvent, CalendarError> {
        const HALF_YEAR: f64 = 365.2425 / 2.0;
        let (mut year, _, _) = date.gregorian();
        let event = self.ephemeris.solar_event(year, kind)?;
        let days_off = Ut::from(event.time).0 - date.jdn() as f64;
        if days_off > HALF_YEAR {
            year -= 1;
        } else if days_off < -HALF_YEAR {
            year += 1;
        } else {
            return Ok(event);
        }
        self.ephemeris.solar_event(year, kind)
    }

    /// The day containing `time`.
    ///
    /// Fails with [`CalendarError::OutOfRange`] before sunrise of the epoch.
    pub fn find_day(&self, time: DateTime<Utc>) -> Result<Day, CalendarError> {
        let date = self.local_date(time)?;
        trace!(%time, local_date = %date, "finding day");
        self.day_at(date)
    }

    /// The day beginning at sunrise of the local civil date `date`.
    pub fn day_at(&self, date: Date) -> Result<Day, CalendarError> {
        let index = u32::try_from(date - self.epoch.date).map_err(|_| CalendarError::OutOfRange {
            date,
            epoch: self.epoch.date,
        })?;
        for layout in self.seasons() {
            let layout = layout?;
            if layout.contains(index) {
                return Ok(layout.day(index));
            }
        }
        unreachable!("seasons only end after an error")
    }

    /// Layout of `season` of `year`.
    pub fn season(&self, year: u32, season: Season) -> Result<SeasonLayout, CalendarError> {
        if year == 0 {
            return Err(CalendarError::InvalidDate(format!("{season} of year 0")));
        }
        for layout in self.seasons() {
            let layout = layout?;
            if layout.year == year && layout.season == season {
                return Ok(layout);
            }
        }
        unreachable!("seasons only end after an error")
    }

    /// Reverse lookup: the day identified by `date`.
    ///
    /// Fails with [`CalendarError::InvalidDate`] if no such day exists, e.g.
    /// the second holiday week of a season without leap week.
    pub fn resolve(&self, date: &CalendarDate) -> Result<Day, CalendarError> {
        let invalid = || {
            CalendarError::InvalidDate(format!(
                "{} of week {} of {}, year {}",
                date.weekday,
                date.week,
                date.block(),
                date.year
            ))
        };
        if date.year == 0 {
            return Err(invalid());
        }
        let offset = date.season_offset().ok_or_else(invalid)?;
        for layout in self.seasons() {
            let layout = layout?;
            if layout.year == date.year && layout.season == date.season {
                if offset >= layout.len_days() {
                    return Err(invalid());
                }
                return Ok(layout.day(layout.first_day + offset));
            }
        }
        unreachable!("seasons only end after an error")
    }

    /// All days of calendar year `year`.
    pub fn year(&self, year: u32) -> Result<YearGrid, CalendarError> {
        if year == 0 {
            return Err(CalendarError::InvalidDate("year 0".to_owned()));
        }
        let mut seasons = Vec::with_capacity(Season::ALL.len());
        for layout in self.seasons() {
            let layout = layout?;
            if layout.year == year {
                seasons.push(layout);
                if seasons.len() == Season::ALL.len() {
                    return Ok(YearGrid { year, seasons });
                }
            }
        }
        unreachable!("seasons only end after an error")
    }
}

/// Iterator over the [`SeasonLayout`]s of a calendar, see
/// [`Calendar::seasons`].
#[derive(Debug, Clone)]
pub struct Seasons<'a, E> {
    calendar: &'a Calendar<E>,
    next: Option<SeasonStart>,
}

/// What is known about a season before laying it out.
#[derive(Debug, Copy, Clone)]
struct SeasonStart {
    year: u32,
    season: Season,
    first_day: u32,
    /// Closing event of the season before, and its day.
    opening: Option<(SolarEvent, i64)>,
}

impl<E: Ephemeris> Iterator for Seasons<'_, E> {
    type Item = Result<SeasonLayout, CalendarError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next.take()?;
        let layout = self.calendar.layout(next);
        if let Ok(layout) = &layout {
            self.next = Some(layout.next_start());
        }
        Some(layout)
    }
}

/// The days of one calendar year, laid out ahead of time.
///
/// ```
/// use cubic_calendar::astro::Location;
/// use cubic_calendar::cubic::{Calendar, Season};
///
/// let calendar = Calendar::new(Location::SYDNEY);
/// let grid = calendar.year(1).unwrap();
/// let first = grid.days().next().unwrap();
///
/// assert_eq!("2024-09-22", first.gregorian.iso_gregorian());
/// assert_eq!(Season::Spring, first.date.season);
/// // Restartable: every call begins at the first day again.
/// assert_eq!(Some(first), grid.days().next());
/// assert_eq!(grid.len_days() as usize, grid.days().count());
/// ```
#[derive(Debug, Clone)]
pub struct YearGrid {
    year: u32,
    seasons: Vec<SeasonLayout>,
}

impl YearGrid {
    pub fn year(&self) -> u32 {
        self.year
    }
    pub fn seasons(&self) -> &[SeasonLayout] {
        &self.seasons
    }
    pub fn len_days(&self) -> u32 {
        self.seasons.iter().map(SeasonLayout::len_days).sum()
    }

    /// Every day of the year, in order.
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.seasons
            .iter()
            .flat_map(|layout| (layout.first_day..layout.end_day()).map(|day| layout.day(day)))
    }

    /// The days of `block`.
    pub fn block_days(&self, block: Block) -> impl Iterator<Item = Day> + '_ {
        self.days().filter(move |day| day.date.block() == block)
    }

    /// The sixteen blocks of a year: three months and a holiday per season.
    pub fn blocks() -> impl Iterator<Item = Block> {
        Season::ALL
            .into_iter()
            .flat_map(|season| Month::ALL.into_iter().map(move |month| Block { season, month }))
    }
}
