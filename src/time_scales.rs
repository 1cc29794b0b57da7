//! Deals with different time scales, specifically, conversion from TT (in
//! which the equinox and solstice series are computed) into UT, and between
//! UT and `chrono` instants.
//!
//! Only conversions necessary for other computations in this crate are
//! included for now.

use chrono::{DateTime, Utc};

use crate::date::Date;

/// Julian date of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Note: TT differs no more than centisenconds from TDB, so ephemeris
/// series given in "Julian Ephemeris Days" are used as TT directly.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl From<Tai> for Tt {
    fn from(tai: Tai) -> Tt {
        Tt(tai.0 + 32.184 / 86400.0)
    }
}

/// [International atomic time](https://en.wikipedia.org/wiki/International_Atomic_Time),
/// represented in Julian date (JD).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tai(pub f64);

impl From<Tt> for Tai {
    fn from(tt: Tt) -> Tai {
        Tai(tt.0 - 32.184 / 86400.0)
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point.
///
/// This is UTC (based on TAI with leap seconds) from 1972-01-01T00:00Z to the
/// end of the known leap second table, and an estimate of UT1 (mean solar
/// time on the Prime Meridian) after it.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Tries to convert a TAI (or other time scale easily convertible to TAI)
    /// into UT.
    ///
    /// Returns `None` for time before 1972-01-01, where UTC had no fixed
    /// relation to TAI.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::time_scales::{Tt, Ut};
    /// let tt = Tt(2451543.166666667);
    /// let ut = Ut::convert(tt).unwrap();
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// ```
    pub fn convert<T>(time: T) -> Option<Self>
    where
        T: Into<Tai>,
    {
        let tai = time.into();
        let leap_seconds::Data {
            starts,
            leap_seconds,
            expires,
            c2,
        } = leap_seconds::data();

        if tai < *starts {
            return None;
        } else if tai > *expires {
            let diff = leap_seconds::estimate(tai) + c2;
            return Some(Ut(tai.0 - diff / 86400.0)); // UT1 rather than UTC
        }

        let offset = match leap_seconds.partition_point(|ls| ls.tai <= tai) {
            0 => leap_seconds::INITIAL_OFFSET,
            i => leap_seconds[i - 1].offset_secs,
        };
        Some(Ut(tai.0 - offset as f64 / 86400.0))
    }
    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes`minutes.
    ///
    /// For Sydney standard time (UTC+10), `tz_offset_minutes` should be +600.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::time_scales::Ut;
    /// // 2024-09-22T15:00Z
    /// let ut = Ut(2460576.125);
    /// assert_eq!((2024, 9, 22), ut.date_in_timezone(0).gregorian());
    /// assert_eq!((2024, 9, 23), ut.date_in_timezone(600).gregorian());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        let jdn = (self.0 + tz_offset_minutes as f64 / 1440.0).round() as u32;
        Date::from_jdn(jdn)
    }

    /// Converts into a `chrono` instant, rounded to the millisecond.
    ///
    /// Returns `None` outside of `chrono`'s supported range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let millis = ((self.0 - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
        if !millis.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }
}

impl From<DateTime<Utc>> for Ut {
    fn from(time: DateTime<Utc>) -> Ut {
        Ut(UNIX_EPOCH_JD + time.timestamp_millis() as f64 / MILLIS_PER_DAY)
    }
}

mod leap_seconds {
    use super::Tai;
    use super::Tt;
    use crate::date::Date;
    use std::sync::OnceLock;

    /// TAI - UTC at 1972-01-01T00:00Z.
    pub const INITIAL_OFFSET: i32 = 10;

    /// Dates whose last UTC minute had a leap second inserted.
    pub const DATES: &[(i32, i32, i32)] = &[
        (1972, 6, 30),
        (1972, 12, 31),
        (1973, 12, 31),
        (1974, 12, 31),
        (1975, 12, 31),
        (1976, 12, 31),
        (1977, 12, 31),
        (1978, 12, 31),
        (1979, 12, 31),
        (1981, 6, 30),
        (1982, 6, 30),
        (1983, 6, 30),
        (1985, 6, 30),
        (1987, 12, 31),
        (1989, 12, 31),
        (1990, 12, 31),
        (1992, 6, 30),
        (1993, 6, 30),
        (1994, 6, 30),
        (1995, 12, 31),
        (1997, 6, 30),
        (1998, 12, 31),
        (2005, 12, 31),
        (2008, 12, 31),
        (2012, 6, 30),
        (2015, 6, 30),
        (2016, 12, 31),
    ];
    /// Last date covered by the table above (IERS Bulletin C).
    pub const DATE_EXPIRES: (i32, i32, i32) = (2026, 12, 31);

    #[derive(Debug, Clone)]
    pub struct Data {
        pub starts: Tai,
        pub leap_seconds: Vec<LeapSecond>,
        pub expires: Tai,
        pub c2: f64,
    }
    /// From `tai` onwards, TAI - UTC is `offset_secs`.
    #[derive(Debug, Clone)]
    pub struct LeapSecond {
        pub tai: Tai,
        pub offset_secs: i32,
    }

    static DATA: OnceLock<Data> = OnceLock::new();

    /// TAI of the UTC midnight ending the date `(y, m, d)`.
    fn midnight_after(date: (i32, i32, i32), offset_secs: i32) -> Tai {
        let (y, m, d) = date;
        let jdn = Date::from_gregorian(y, m, d)
            .unwrap_or_else(|| panic!("date not recognized: {:?}", (y, m, d)))
            .jdn();
        Tai(jdn as f64 + 0.5 + offset_secs as f64 / 86400.0)
    }

    pub fn data() -> &'static Data {
        DATA.get_or_init(|| {
            let starts = midnight_after((1971, 12, 31), INITIAL_OFFSET);
            let leap_seconds: Vec<_> = (INITIAL_OFFSET + 1..)
                .zip(DATES)
                .map(|(offset_secs, &date)| LeapSecond {
                    tai: midnight_after(date, offset_secs),
                    offset_secs,
                })
                .collect();
            let last_offset = INITIAL_OFFSET + DATES.len() as i32;
            let expires = midnight_after(DATE_EXPIRES, last_offset);
            let c2 = last_offset as f64 - estimate(expires);
            Data {
                starts,
                leap_seconds,
                expires,
                c2,
            }
        })
    }

    /// Long-term trend of Earth's rotation, only used for its variation
    /// beyond the table; `c2` anchors it to the last known offset.
    pub fn estimate<T: Into<Tt>>(tt: T) -> f64 {
        use std::f64::consts::PI;
        let tt = tt.into();
        let y = (tt.0 - 2451544.5) / 365.2425 + 2000.0;
        let t = (y - 1825.0) / 100.0;
        31.4115 * t * t + 284.8435805251424 * (2.0 * PI * (t + 0.75) / 14.0).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tt_to_ut() {
        let tt = Tt(2451543.166666667);
        let ut = Ut::convert(tt).unwrap();
        assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
        assert_eq!((1999, 12, 30), ut.date_in_timezone(480).gregorian());
        let ut_midnight = Ut(ut.0 + (32.0 + 32.184) / 86400.0);
        let ut_before_midnight = Ut(ut_midnight.0 - 1.0 / 86400.0);
        assert_eq!(
            (1999, 12, 30),
            ut_before_midnight.date_in_timezone(480).gregorian()
        );
        assert_eq!(
            (1999, 12, 31),
            ut_midnight.date_in_timezone(480).gregorian()
        );
    }

    #[test]
    fn offset_follows_table() {
        // 2024: TAI - UTC = 37 s, TT - UTC = 69.184 s.
        let tt = Tt(2460576.0);
        let ut = Ut::convert(tt).unwrap();
        assert_abs_diff_eq!((tt.0 - ut.0) * 86400.0, 69.184, epsilon = 1e-3);
        // Right after 1972-01-01: 10 s.
        let tai = Tai(2441317.5 + 60.0 / 86400.0);
        let ut = Ut::convert(tai).unwrap();
        assert_abs_diff_eq!((tai.0 - ut.0) * 86400.0, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn before_utc_is_unsupported() {
        assert_eq!(None, Ut::convert(Tt(2440000.0)));
    }

    #[test]
    fn beyond_table_is_continuous() {
        let tt = Tt(2462502.0); // 2030
        let ut = Ut::convert(tt).unwrap();
        let diff_secs = (tt.0 - ut.0) * 86400.0;
        assert!((69.0..71.0).contains(&diff_secs), "{diff_secs}");
    }

    #[test]
    fn chrono_round_trip() {
        let time = DateTime::parse_from_rfc3339("2024-09-22T12:43:40Z")
            .unwrap()
            .with_timezone(&Utc);
        let ut = Ut::from(time);
        assert_abs_diff_eq!(ut.0, 2460576.0303241, epsilon = 1e-6);
        assert_eq!(Some(time), ut.to_datetime());
    }
}
