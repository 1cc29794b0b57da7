//! A solar-seasonal calendar aligned with equinoxes, solstices and local
//! sunrise.
//!
//! The year is divided into four seasons of twelve working weeks, each
//! followed by a holiday of one week, or two when the closing equinox or
//! solstice falls late. Days begin at local sunrise, so the calendar depends
//! on where it is observed from.
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use cubic_calendar::{Date, Weekday};
//!
//! let date = Date::from_gregorian(2024, 9, 22).unwrap();
//!
//! assert_eq!(Weekday::Sunday, date.weekday());
//! assert_eq!(2460576, date.jdn());
//! ```
//!
//! The cubic calendar, as seen from Sydney:
//!
//! ```
//! use cubic_calendar::{Calendar, Date, Location};
//!
//! let calendar = Calendar::new(Location::SYDNEY);
//! let day = calendar.day_at(Date::from_gregorian(2025, 9, 21).unwrap()).unwrap();
//!
//! assert!(day.is_leap_week());
//! assert_eq!("Sunday the 8th of the Vernal Equinox Holiday, Year 1", day.date.to_string());
//! ```

pub mod astro;
pub mod cubic;
pub mod date;
pub mod error;
pub mod time_scales;

pub use astro::{Ephemeris, Location, Meeus};
pub use cubic::{Calendar, CalendarDate, Day, Epoch};
pub use date::{Date, Weekday};
pub use error::CalendarError;
