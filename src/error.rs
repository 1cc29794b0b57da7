//! Error type shared by the astronomical engine and the calendar mapper.

use chrono::{DateTime, Utc};

use crate::cubic::Season;
use crate::date::Date;

/// Error type for all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// The queried day precedes the epoch.
    #[error("{date} precedes the calendar epoch {epoch}")]
    OutOfRange { date: Date, epoch: Date },

    /// The astronomical engine cannot resolve an instant for this date and
    /// location, e.g. polar day or polar night.
    #[error("astronomical data unavailable for {subject}: {reason}")]
    AstronomicalDataUnavailable { subject: String, reason: String },

    /// A season's closing event falls even after the leap week.
    #[error(
        "{season} of year {year}: closing event at {event} is later than the leap week threshold {threshold}"
    )]
    LeapWeekOverflow {
        year: u32,
        season: Season,
        event: DateTime<Utc>,
        threshold: DateTime<Utc>,
    },

    #[error("invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("invalid epoch {date}: {reason}")]
    InvalidEpoch { date: Date, reason: &'static str },

    /// No such day exists in the calendar.
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),
}
