//! Command-line flags merged over the configuration file.

use std::fmt::Display;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use cubic_calendar::cubic::fmt;
use cubic_calendar::{Calendar, Date, Epoch, Location};

use crate::cli::Cli;
use crate::config::CalendarConfig;

/// Time zone in which instants are shown to the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DisplayZone {
    Local,
    Named(Tz),
}

impl DisplayZone {
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name {
            None => Ok(DisplayZone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(DisplayZone::Named)
                .map_err(|e| anyhow!("unknown time zone {name:?}: {e}")),
        }
    }

    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        match self {
            DisplayZone::Local => fmt::time(instant, &Local),
            DisplayZone::Named(tz) => fmt::time(instant, tz),
        }
    }

    /// Reads `naive` as a wall-clock time in this zone.
    fn resolve_local(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        fn earliest<Z: TimeZone>(tz: &Z, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
            tz.from_local_datetime(naive)
                .earliest()
                .map(|t| t.with_timezone(&Utc))
        }
        match self {
            DisplayZone::Local => earliest(&Local, naive),
            DisplayZone::Named(tz) => earliest(tz, naive),
        }
    }
}

impl Display for DisplayZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayZone::Local => f.write_str("local time"),
            DisplayZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Everything a command needs to run.
#[derive(Debug)]
pub struct Settings {
    pub calendar: Calendar,
    pub zone: DisplayZone,
    /// The instant asked about.
    pub time: DateTime<Utc>,
    /// Whether `time` was given rather than taken from the clock.
    pub explicit_time: bool,
    pub blocks: usize,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: CalendarConfig) -> Result<Self> {
        let latitude = cli.latitude.unwrap_or(config.latitude);
        let longitude = cli.longitude.unwrap_or(config.longitude);
        let location = Location::new(latitude, longitude)?;

        let zone = DisplayZone::parse(cli.timezone.as_deref().or(config.timezone.as_deref()))?;

        let epoch = match cli.epoch.as_deref().or(config.epoch.as_deref()) {
            Some(s) => parse_epoch(s)?,
            None => Epoch::canonical(location.hemisphere()),
        };

        let (time, explicit_time) = match cli.time.as_deref() {
            Some(s) => (parse_time(s, &zone)?, true),
            None => (Utc::now(), false),
        };

        debug!(%location, epoch = %epoch.date(), %zone, %time, "settings resolved");
        Ok(Self {
            calendar: Calendar::with_epoch(location, epoch, Default::default()),
            zone,
            time,
            explicit_time,
            blocks: config.blocks,
        })
    }
}

fn parse_epoch(s: &str) -> Result<Epoch> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid epoch {s:?}, expected YYYY-MM-DD"))?;
    let date = Date::from_naive(date).ok_or_else(|| anyhow!("epoch {s} is out of range"))?;
    Ok(Epoch::new(date)?)
}

/// RFC 3339, or an ISO 8601 date and time without offset read in `zone`.
fn parse_time(s: &str, zone: &DisplayZone) -> Result<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }
    let naive = s
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("invalid time {s:?}"))?;
    zone.resolve_local(&naive)
        .ok_or_else(|| anyhow!("{s} does not exist in {zone}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cubic-calendar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let config = CalendarConfig {
            latitude: 51.5,
            longitude: -0.13,
            timezone: Some("Europe/London".to_owned()),
            epoch: None,
            blocks: 4,
        };
        let settings = Settings::resolve(&cli(&["--timezone", "Asia/Tokyo"]), config).unwrap();
        assert_eq!(51.5, settings.calendar.location().latitude);
        assert_eq!(DisplayZone::Named(chrono_tz::Asia::Tokyo), settings.zone);
        assert_eq!("2025-03-23", settings.calendar.epoch().date().iso_gregorian());
        assert_eq!(4, settings.blocks);
        assert!(!settings.explicit_time);
    }

    #[test]
    fn explicit_epoch() {
        let settings = Settings::resolve(
            &cli(&["--epoch", "2024-09-29"]),
            CalendarConfig::default(),
        )
        .unwrap();
        assert_eq!("2024-09-29", settings.calendar.epoch().date().iso_gregorian());

        let err = Settings::resolve(&cli(&["--epoch", "2024-09-30"]), CalendarConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("not a Sunday"));
    }

    #[test]
    fn epoch_before_day_zero() {
        for epoch in ["--epoch=-5000-01-01", "--epoch=-4713-11-23"] {
            let err = Settings::resolve(&cli(&[epoch]), CalendarConfig::default()).unwrap_err();
            assert!(format!("{err:#}").contains("out of range"), "{err:#}");
        }
        let config = CalendarConfig {
            epoch: Some("-5000-01-03".to_owned()),
            ..CalendarConfig::default()
        };
        assert!(Settings::resolve(&cli(&[]), config).is_err());
    }

    #[test]
    fn bad_location_and_zone() {
        assert!(Settings::resolve(&cli(&["--latitude", "-95"]), CalendarConfig::default()).is_err());
        assert!(
            Settings::resolve(&cli(&["--timezone", "Mars/Olympus"]), CalendarConfig::default())
                .is_err()
        );
    }

    #[test]
    fn times() {
        let sydney = DisplayZone::Named(chrono_tz::Australia::Sydney);
        let expected = DateTime::parse_from_rfc3339("2024-09-22T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(expected, parse_time("2024-09-22T12:00:00+10:00", &sydney).unwrap());
        assert_eq!(expected, parse_time("2024-09-22T12:00:00", &sydney).unwrap());
        assert_eq!(expected, parse_time("2024-09-22 12:00:00", &sydney).unwrap());
        assert_eq!(expected, parse_time("2024-09-22T12:00", &sydney).unwrap());
        assert!(parse_time("yesterday", &sydney).is_err());
        // Skipped by the start of daylight saving time.
        assert!(parse_time("2024-10-06T02:30:00", &sydney).is_err());
    }

    #[test]
    fn display_zone_format() {
        let zone = DisplayZone::parse(Some("Australia/Sydney")).unwrap();
        let instant = DateTime::parse_from_rfc3339("2024-12-21T09:20:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!("21/12/2024 20:20", zone.format(&instant));
        assert_eq!("Australia/Sydney", zone.to_string());
    }
}
