//! Calendar-independant civil date.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, NaiveDate};

/// Julian day number of 0000-12-31 (proleptic Gregorian), i.e. day 0 of
/// `chrono`'s "days from CE" count.
const JDN_CE_OFFSET: i32 = 1_721_425;

/// A calendar-independant date.
///
/// Supported range begins from January 1, 4713 BC, proleptic Julian calendar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: u32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: u32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> u32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc.
    ///
    /// Returns `None` if the result date is out of supported range or the
    /// month/day do not exist.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    /// assert!(Date::from_gregorian(2025, 2, 29).is_none());
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Option<Self> {
        let (y, m, d) = (year, month, day);
        if !(1..=12).contains(&m) || !(1..=31).contains(&d) {
            return None;
        }
        let date = u32::try_from(
            (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
                - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
                + d
                - 32075,
        )
        .map(Self::from_jdn)
        .ok()?;
        // Days past the end of the month roll over; reject them.
        (date.gregorian() == (y, m, d)).then_some(date)
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        // Intermediate values overflow i32 for large JDNs.
        let jdn = i64::from(self.jdn);
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year as i32, month as i32, day as i32)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!("2000-01-01", date.iso_gregorian());
    /// ```
    pub fn iso_gregorian(&self) -> String {
        let (y, m, d) = self.gregorian();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// Returns the day of week of the date.
    ///
    /// # Example
    ///
    /// ```
    /// use cubic_calendar::{Date, Weekday};
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(Weekday::Saturday, date.weekday());
    /// ```
    pub fn weekday(&self) -> Weekday {
        Weekday::from_index((self.jdn + 1) % 7)
    }

    /// Converts from a `chrono` date, `None` before January 1, 4713 BC
    /// (proleptic Julian).
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use cubic_calendar::Date;
    ///
    /// let naive = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    /// assert_eq!(Some(2451545), Date::from_naive(naive).map(|d| d.jdn()));
    /// assert!(Date::from_naive(NaiveDate::from_ymd_opt(-5000, 1, 1).unwrap()).is_none());
    /// ```
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        u32::try_from(date.num_days_from_ce() + JDN_CE_OFFSET)
            .ok()
            .map(Self::from_jdn)
    }
    /// Converts into a `chrono` date, `None` outside of `chrono`'s range.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        let days = i32::try_from(i64::from(self.jdn) - i64::from(JDN_CE_OFFSET)).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso_gregorian())
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(if rhs >= 0 {
            self.jdn + rhs as u32
        } else {
            self.jdn - rhs.wrapping_neg() as u32
        })
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn as i32 - rhs.jdn as i32
    }
}

/// Day of week. Weeks begin on Sunday.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays, starting from Sunday.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Weekday at position `index` counted from Sunday, modulo 7.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 7) as usize]
    }
    /// Position in the week, `0` for Sunday through `6` for Saturday.
    pub fn index(&self) -> u32 {
        *self as u32
    }
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
    /// Three-letter abbreviation, as used in calendar headers.
    pub fn abbrev(&self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let date = Date::from_jdn(2440588);
        assert_eq!(2440588, date.jdn());
    }

    #[test]
    fn from_gregorian() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(2440588, date.jdn());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(2459466, date.jdn());
    }

    #[test]
    fn from_gregorian_rejects_missing_days() {
        assert_eq!(None, Date::from_gregorian(2023, 2, 29));
        assert_eq!(None, Date::from_gregorian(2024, 4, 31));
        assert_eq!(None, Date::from_gregorian(2024, 13, 1));
        assert!(Date::from_gregorian(2024, 2, 29).is_some());
    }

    #[test]
    fn to_gregorian() {
        let date = Date::from_jdn(2440588);
        assert_eq!((1970, 1, 1), date.gregorian());
        let date = Date::from_jdn(2459466);
        assert_eq!((2021, 9, 8), date.gregorian());
        let date = Date::from_jdn(2451545);
        assert_eq!((2000, 1, 1), date.gregorian());
    }

    #[test]
    fn to_weekday() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(Weekday::Thursday, date.weekday());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(Weekday::Wednesday, date.weekday());
        let date = Date::from_gregorian(2024, 9, 22).unwrap();
        assert_eq!(Weekday::Sunday, date.weekday());
        assert_eq!(Weekday::Monday, (date + 1).weekday());
    }

    #[test]
    fn arithmetic() {
        let date = Date::from_gregorian(2024, 9, 22).unwrap();
        assert_eq!("2024-12-15", (date + 84).iso_gregorian());
        assert_eq!("2024-09-21", (date + -1).iso_gregorian());
        assert_eq!(84, (date + 84) - date);
    }

    #[test]
    fn chrono_conversion() {
        let naive = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let date = Date::from_naive(naive).unwrap();
        assert_eq!(2451545, date.jdn());
        assert_eq!(Some(naive), date.to_naive());
    }

    #[test]
    fn chrono_conversion_range() {
        // JDN 0 is -4713-11-24 in the proleptic Gregorian calendar.
        let first = NaiveDate::from_ymd_opt(-4713, 11, 24).unwrap();
        assert_eq!(Some(0), Date::from_naive(first).map(|d| d.jdn()));
        assert_eq!(None, Date::from_naive(first.pred_opt().unwrap()));
        for year in [-5000, -262_000] {
            let naive = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            assert_eq!(None, Date::from_naive(naive));
        }
        assert_eq!(None, Date::from_naive(NaiveDate::MIN));
        assert!(Date::from_naive(NaiveDate::MAX).is_some());

        assert_eq!((-4713, 11, 24), Date::from_jdn(0).gregorian());
        assert_eq!(None, Date::from_jdn(u32::MAX).to_naive());
        let (year, _, _) = Date::from_jdn(u32::MAX).gregorian();
        assert!(year > 11_000_000);
    }

    #[test]
    fn iso_format() {
        assert_eq!(
            "2021-09-08",
            Date::from_gregorian(2021, 9, 8).unwrap().iso_gregorian()
        );
        assert_eq!("2021-09-08", Date::from_jdn(2459466).to_string());
    }

    #[test]
    fn weekday_names() {
        assert_eq!("Sun", Weekday::Sunday.abbrev());
        assert_eq!("Wednesday", Weekday::Wednesday.to_string());
        assert_eq!(Weekday::Sunday, Weekday::from_index(7));
        assert_eq!(6, Weekday::Saturday.index());
    }
}
