//! Sunrise and sunset.
//!
//! Computed with the NREL Solar Position Algorithm from `solar-positioning`,
//! for the standard horizon of -0.833° (refraction plus the solar
//! semi-diameter).

use chrono::{Duration, NaiveTime};
use solar_positioning::time::DeltaT;
use solar_positioning::{Horizon, SunriseResult, spa};

use super::{Location, SunTimes};
use crate::date::Date;
use crate::error::CalendarError;

/// Shifts `hours` by whole days so that it lies within half a day of `anchor`.
fn nearest(hours: f64, anchor: f64) -> f64 {
    hours - ((hours - anchor) / 24.0).round() * 24.0
}

/// Sunrise and sunset of the local civil date `date` at `location`.
///
/// # Example
///
/// ```
/// use cubic_calendar::Date;
/// use cubic_calendar::astro::{Location, sun};
///
/// let date = Date::from_gregorian(2024, 9, 22).unwrap();
/// let times = sun::sun_times(date, &Location::SYDNEY).unwrap();
/// // Roughly 05:45 and 17:52 Sydney time.
/// assert_eq!("2024-09-21 19", times.sunrise.format("%Y-%m-%d %H").to_string());
/// assert_eq!("2024-09-22 07", times.sunset.format("%Y-%m-%d %H").to_string());
/// ```
pub fn sun_times(date: Date, location: &Location) -> Result<SunTimes, CalendarError> {
    let unavailable = |reason: String| CalendarError::AstronomicalDataUnavailable {
        subject: format!("sunrise and sunset on {date} at {location}"),
        reason,
    };
    let midnight = date
        .to_naive()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .ok_or_else(|| unavailable("outside of the representable time range".to_owned()))?;

    let (year, month, day) = date.gregorian();
    let delta_t = DeltaT::estimate_from_date(year, month as u32)
        .map_err(|e| unavailable(e.to_string()))?;
    let result = spa::sunrise_sunset_utc_for_horizon(
        year,
        month as u32,
        day as u32,
        location.latitude,
        location.longitude,
        delta_t,
        Horizon::SunriseSunset,
    )
    .map_err(|e| unavailable(e.to_string()))?;

    let (sunrise, transit, sunset) = match result {
        SunriseResult::RegularDay {
            sunrise,
            transit,
            sunset,
        } => (sunrise.hours(), transit.hours(), sunset.hours()),
        SunriseResult::AllDay { .. } => {
            return Err(unavailable(
                "the sun stays above the horizon (polar day)".to_owned(),
            ));
        }
        SunriseResult::AllNight { .. } => {
            return Err(unavailable(
                "the sun stays below the horizon (polar night)".to_owned(),
            ));
        }
    };

    // Hours count from midnight UTC of `date`; pin them to the local day
    // around its mean solar noon.
    let transit = nearest(transit, 12.0 - location.longitude / 15.0);
    let sunrise = nearest(sunrise, transit - 6.0);
    let sunset = nearest(sunset, transit + 6.0);
    let at = |hours: f64| midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64);
    Ok(SunTimes {
        sunrise: at(sunrise),
        sunset: at(sunset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn assert_near(expected: &str, actual: DateTime<Utc>) {
        let diff = (actual - utc(expected)).num_seconds().abs();
        assert!(diff <= 180, "expected {expected}, got {actual}");
    }

    #[test]
    fn sydney() {
        let dataset = [
            ((2024, 9, 22), "2024-09-21T19:44:41Z", "2024-09-22T07:51:36Z"),
            ((2024, 12, 23), "2024-12-22T18:41:54Z", "2024-12-23T09:06:36Z"),
            ((2024, 6, 21), "2024-06-20T21:00:03Z", "2024-06-21T06:53:56Z"),
        ];
        for ((y, m, d), rise, set) in dataset {
            let date = Date::from_gregorian(y, m, d).unwrap();
            let times = sun_times(date, &Location::SYDNEY).unwrap();
            assert_near(rise, times.sunrise);
            assert_near(set, times.sunset);
            assert!(times.sunrise < times.sunset);
        }
    }

    #[test]
    fn western_longitude() {
        // New York, 2024-06-20: about 05:25 and 20:31 EDT.
        let location = Location::new(40.7128, -74.0060).unwrap();
        let date = Date::from_gregorian(2024, 6, 20).unwrap();
        let times = sun_times(date, &location).unwrap();
        assert_near("2024-06-20T09:25:00Z", times.sunrise);
        assert_near("2024-06-21T00:31:00Z", times.sunset);
    }

    #[test]
    fn consecutive_days_are_ordered() {
        // Just south of the Arctic Circle the winter days are short but
        // the sun still rises.
        let location = Location::new(66.0, 25.0).unwrap();
        let start = Date::from_gregorian(2024, 12, 10).unwrap();
        let mut previous: Option<SunTimes> = None;
        for offset in 0..24 {
            let times = sun_times(start + offset, &location).unwrap();
            assert!(times.sunrise < times.sunset);
            assert!(times.sunset - times.sunrise < Duration::hours(4));
            if let Some(previous) = previous {
                assert!(previous.sunset < times.sunrise);
                let gap = times.sunrise - previous.sunrise;
                assert!((gap - Duration::days(1)).num_minutes().abs() < 10);
            }
            previous = Some(times);
        }
    }

    #[test]
    fn polar_day_and_night() {
        let longyearbyen = Location::new(78.22, 15.65).unwrap();
        let midsummer = Date::from_gregorian(2024, 6, 21).unwrap();
        let midwinter = Date::from_gregorian(2024, 12, 21).unwrap();
        for date in [midsummer, midwinter] {
            assert!(matches!(
                sun_times(date, &longyearbyen),
                Err(CalendarError::AstronomicalDataUnavailable { .. })
            ));
        }
    }
}
