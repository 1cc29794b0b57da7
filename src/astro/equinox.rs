//! Equinoxes and solstices.
//!
//! Mean instants and periodic terms from Meeus, *Astronomical Algorithms*
//! (2nd ed.), chapter 27, valid for years 1000 to 3000.

use std::ops::RangeInclusive;

use super::{SolarEvent, SolarEventKind};
use crate::error::CalendarError;
use crate::time_scales::{Tt, Ut};

/// Years covered by the mean-instant polynomials.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1000..=3000;

/// Polynomial coefficients of the mean instant (JDE), in powers of
/// `Y = (year - 2000) / 1000`.
const MEAN: [[f64; 5]; 4] = [
    [2451623.80984, 365242.37404, 0.05169, -0.00411, -0.00057],
    [2451716.56767, 365241.62603, 0.00325, 0.00888, -0.00030],
    [2451810.21715, 365242.01767, -0.11575, 0.00337, 0.00078],
    [2451900.05952, 365242.74049, -0.06223, -0.00823, 0.00032],
];

/// Periodic terms `(A, B, C)` of `S = Σ A cos(B + C T)`, angles in degrees.
const PERIODIC: [(f64, f64, f64); 24] = [
    (485.0, 324.96, 1934.136),
    (203.0, 337.23, 32964.467),
    (199.0, 342.08, 20.186),
    (182.0, 27.85, 445267.112),
    (156.0, 73.14, 45036.886),
    (136.0, 171.52, 22518.443),
    (77.0, 222.54, 65928.934),
    (74.0, 296.72, 3034.906),
    (70.0, 243.58, 9037.513),
    (58.0, 119.81, 33718.147),
    (52.0, 297.17, 150.678),
    (50.0, 21.02, 2281.226),
    (45.0, 247.54, 29929.562),
    (44.0, 325.15, 31555.956),
    (29.0, 60.93, 4443.417),
    (18.0, 155.12, 67555.328),
    (17.0, 288.79, 4562.452),
    (16.0, 198.04, 62894.029),
    (14.0, 199.76, 31436.921),
    (12.0, 95.39, 14577.848),
    (12.0, 287.11, 31931.756),
    (12.0, 320.81, 34777.259),
    (9.0, 227.73, 1222.114),
    (8.0, 15.45, 16859.074),
];

/// Instant of the event in dynamical time, `None` outside
/// [`SUPPORTED_YEARS`].
///
/// # Example
///
/// ```
/// use cubic_calendar::astro::{SolarEventKind, equinox};
///
/// // 1962 June solstice, Meeus example 27.a: JDE 2437837.39245
/// let jde = equinox::jde(1962, SolarEventKind::JuneSolstice).unwrap();
/// assert!((jde.0 - 2437837.39245).abs() < 1e-4);
/// ```
pub fn jde(year: i32, kind: SolarEventKind) -> Option<Tt> {
    if !SUPPORTED_YEARS.contains(&year) {
        return None;
    }
    let y = (year - 2000) as f64 / 1000.0;
    let coeffs = &MEAN[kind as usize];
    let jde0 = coeffs.iter().rev().fold(0.0, |acc, c| acc * y + c);

    let t = (jde0 - 2451545.0) / 36525.0;
    let w = (35999.373 * t - 2.47).to_radians();
    let delta_lambda = 1.0 + 0.0334 * w.cos() + 0.0007 * (2.0 * w).cos();
    let s: f64 = PERIODIC
        .iter()
        .map(|&(a, b, c)| a * (b + c * t).to_radians().cos())
        .sum();
    Some(Tt(jde0 + 0.00001 * s / delta_lambda))
}

/// Instant of the event at UT.
pub fn solar_event(year: i32, kind: SolarEventKind) -> Result<SolarEvent, CalendarError> {
    let unavailable = |reason: &str| CalendarError::AstronomicalDataUnavailable {
        subject: format!("{kind} of {year}"),
        reason: reason.to_owned(),
    };
    let tt = jde(year, kind).ok_or_else(|| unavailable("year outside 1000..=3000"))?;
    let time = Ut::convert(tt)
        .and_then(|ut| ut.to_datetime())
        .ok_or_else(|| unavailable("no UTC before 1972"))?;
    Ok(SolarEvent { kind, time })
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
        assert!(diff <= 120, "expected {expected}, got {actual}");
    }

    #[test]
    fn meeus_example() {
        let jde = jde(1962, SolarEventKind::JuneSolstice).unwrap();
        approx::assert_abs_diff_eq!(jde.0, 2437837.39245, epsilon = 1e-4);
    }

    #[test]
    fn recent_events() {
        use SolarEventKind::*;
        let dataset = [
            (2024, SeptemberEquinox, "2024-09-22T12:44:00Z"),
            (2024, DecemberSolstice, "2024-12-21T09:21:00Z"),
            (2025, MarchEquinox, "2025-03-20T09:01:00Z"),
            (2025, JuneSolstice, "2025-06-21T02:42:00Z"),
            (2025, SeptemberEquinox, "2025-09-22T18:19:00Z"),
            (2025, DecemberSolstice, "2025-12-21T15:03:00Z"),
        ];
        for (year, kind, expected) in dataset {
            let event = solar_event(year, kind).unwrap();
            assert_eq!(kind, event.kind);
            assert_near(expected, event.time);
        }
    }

    #[test]
    fn unsupported_years() {
        assert!(jde(999, SolarEventKind::MarchEquinox).is_none());
        assert!(matches!(
            solar_event(1950, SolarEventKind::MarchEquinox),
            Err(CalendarError::AstronomicalDataUnavailable { .. })
        ));
    }
}
