//! Astronomical engine consumed by the calendar.
//!
//! The calendar only needs two things from astronomy: the instants of the
//! equinoxes and solstices, and the local sunrise/sunset of a civil date.
//! Both are reached through the [`Ephemeris`] trait; [`Meeus`] is the
//! built-in implementation, see [`equinox`] and [`sun`].

use std::fmt;

use chrono::{DateTime, Utc};

use crate::date::Date;
use crate::error::CalendarError;

pub mod equinox;
pub mod sun;

/// Geographic location of the observer.
///
/// # Example
///
/// ```
/// use cubic_calendar::astro::{Hemisphere, Location};
///
/// let oslo = Location::new(59.91, 10.75).unwrap();
/// assert_eq!(Hemisphere::Northern, oslo.hemisphere());
/// assert_eq!(Hemisphere::Southern, Location::default().hemisphere());
/// assert!(Location::new(95.0, 0.0).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    /// Degrees north of the equator, negative for south.
    pub latitude: f64,
    /// Degrees east of Greenwich, negative for west.
    pub longitude: f64,
}

impl Location {
    /// Sydney, Australia.
    pub const SYDNEY: Location = Location {
        latitude: -33.865143,
        longitude: 151.209900,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CalendarError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CalendarError::InvalidLocation {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Locations on the equator count as southern.
    pub fn hemisphere(&self) -> Hemisphere {
        if self.latitude > 0.0 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }

    /// Offset of local mean solar time from UT, in whole minutes.
    pub fn mean_solar_offset_minutes(&self) -> i32 {
        (self.longitude * 4.0).round() as i32
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::SYDNEY
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.3}°{} {:.3}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Hemisphere {
    Northern,
    Southern,
}

/// The four equinoxes and solstices of a Gregorian year, in order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SolarEventKind {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl SolarEventKind {
    pub const ALL: [SolarEventKind; 4] = [
        SolarEventKind::MarchEquinox,
        SolarEventKind::JuneSolstice,
        SolarEventKind::SeptemberEquinox,
        SolarEventKind::DecemberSolstice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SolarEventKind::MarchEquinox => "March equinox",
            SolarEventKind::JuneSolstice => "June solstice",
            SolarEventKind::SeptemberEquinox => "September equinox",
            SolarEventKind::DecemberSolstice => "December solstice",
        }
    }

    /// The equinox that opens spring in `hemisphere`.
    pub fn spring_equinox(hemisphere: Hemisphere) -> Self {
        match hemisphere {
            Hemisphere::Northern => SolarEventKind::MarchEquinox,
            Hemisphere::Southern => SolarEventKind::SeptemberEquinox,
        }
    }
}

impl fmt::Display for SolarEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An equinox or solstice, at UT.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SolarEvent {
    pub kind: SolarEventKind,
    pub time: DateTime<Utc>,
}

/// Sunrise and sunset of one local civil date.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Source of the astronomical instants the calendar is built on.
pub trait Ephemeris {
    /// Instant of the equinox or solstice `kind` in Gregorian `year`.
    fn solar_event(&self, year: i32, kind: SolarEventKind) -> Result<SolarEvent, CalendarError>;

    /// Sunrise and sunset of the local civil date `date` at `location`.
    ///
    /// Fails with [`CalendarError::AstronomicalDataUnavailable`] when the sun
    /// does not rise or does not set on that date.
    fn sun_times(&self, date: Date, location: &Location) -> Result<SunTimes, CalendarError>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn solar_event(&self, year: i32, kind: SolarEventKind) -> Result<SolarEvent, CalendarError> {
        (**self).solar_event(year, kind)
    }
    fn sun_times(&self, date: Date, location: &Location) -> Result<SunTimes, CalendarError> {
        (**self).sun_times(date, location)
    }
}

/// Built-in ephemeris.
///
/// Equinoxes and solstices follow Jean Meeus, *Astronomical Algorithms*, and
/// are good to about a minute for years 1972..=3000. Sunrise and sunset come
/// from the NREL Solar Position Algorithm.
#[derive(Debug, Default, Copy, Clone)]
pub struct Meeus;

impl Ephemeris for Meeus {
    fn solar_event(&self, year: i32, kind: SolarEventKind) -> Result<SolarEvent, CalendarError> {
        equinox::solar_event(year, kind)
    }
    fn sun_times(&self, date: Date, location: &Location) -> Result<SunTimes, CalendarError> {
        sun::sun_times(date, location)
    }
}
