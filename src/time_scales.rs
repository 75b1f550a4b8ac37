//! Deals with different time scales, specifically, conversion from TDB/TT into
//! UT (UTC or UT1) and onwards into [`chrono`] instants.
//!
//! Only conversions necessary for other computations in this crate are
//! included.

use chrono::{DateTime, NaiveDate, Utc};

/// Julian date of 1970-01-01T00:00Z.
const UNIX_EPOCH_JD: f64 = 2440587.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// [Barycentric dynamic time](https://en.wikipedia.org/wiki/Barycentric_Dynamical_Time),
/// represented in Julian date (JD).
///
/// Ephemeris data are typically computed in this
/// time scale, and should be converted to UT when calculating dates.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tdb(pub f64);

impl Tdb {
    /// Inverse of [`Ut::convert`], solved by fixed-point iteration.
    ///
    /// # Example
    ///
    /// ```
    /// use jieqi::time_scales::{Tdb, Ut};
    /// let ut = Ut(2460310.5);
    /// let back = Ut::convert(Tdb::from_ut(ut));
    /// assert!((back.0 - ut.0).abs() < 1e-3 / 86400.0);
    /// ```
    pub fn from_ut(ut: Ut) -> Self {
        let mut tdb = Tdb(ut.0);
        for _ in 0..4 {
            let err = Ut::convert(tdb).0 - ut.0;
            tdb = Tdb(tdb.0 - err);
        }
        tdb
    }
}

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Note: Because TT differs no more than centisenconds from TDB during
/// thousands of years, they are treated numerically the same in this crate.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl From<Tdb> for Tt {
    fn from(tdb: Tdb) -> Tt {
        Tt(tdb.0)
    }
}

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

impl From<Tdb> for Tai {
    fn from(tdb: Tdb) -> Tai {
        Tt::from(tdb).into()
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point.
///
/// This is UTC (coordinated universal time, based on TAI with leap seconds)
/// from 1972-01-01T00:00Z to the expiry of the leap second table, and UT1
/// (mean solar time on the Prime Meridian) outside of that span.
///
/// Before 1972, ΔT comes from the Espenak & Meeus polynomial fits. After the
/// table expires, it is extrapolated with
/// [the long-term parabola described here](https://astro.ukho.gov.uk/nao/lvm/),
/// shifted to stay continuous with the last known offset.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TAI (or other time scale easily convertible to TAI) into
    /// UT.
    ///
    /// # Example
    ///
    /// ```
    /// use jieqi::time_scales::{Tdb, Ut};
    /// let tdb = Tdb(2451543.166666667);
    /// let utc = Ut::convert(tdb).to_utc().unwrap();
    /// assert_eq!("1999-12-30 15:58:55", utc.format("%Y-%m-%d %H:%M:%S").to_string());
    /// ```
    pub fn convert<T>(time: T) -> Self
    where
        T: Into<Tai>,
    {
        let tai = time.into();
        let &leap_seconds::Data {
            starts,
            ref leap_seconds,
            expires,
            c2,
        } = leap_seconds::data();

        if tai < starts {
            let tt = Tt::from(tai);
            return Ut(tt.0 - delta_t::espenak_meeus(tt) / 86400.0); // NOTE UT1, ne UTC
        } else if tai > expires {
            let diff = leap_seconds::estimate(tai) + c2;
            return Ut(tai.0 - diff / 86400.0); // NOTE UT1, ne UTC
        }

        let ls = match leap_seconds.partition_point(|ls| ls.tai <= tai) {
            0 => return Ut(tai.0 - 10.0 / 86400.0),
            i => &leap_seconds[i - 1],
        };
        // 23:59:59 and 23:59:60 share the two TAI seconds after `ls.tai`
        let elapsed = (tai.0 - ls.tai.0) * 86400.0;
        let leap = elapsed.min(2.0) / 2.0;
        Ut(tai.0 - (ls.delta_secs as f64 + leap) / 86400.0)
    }

    /// Takes the UT Julian date as a UTC instant, rounded to the millisecond.
    ///
    /// Returns `None` if the instant is outside of what [`chrono`] can
    /// represent.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let millis = ((self.0 - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }

    /// Reads a UTC instant as a UT Julian date.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Ut(instant.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD)
    }
}

/// Julian date of 00:00 on the given Gregorian date.
fn midnight_jd(year: i32, month: u32, day: u32) -> f64 {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("date not recognized: {:?}", (year, month, day)));
    let days = date.signed_duration_since(NaiveDate::default()).num_days();
    days as f64 + UNIX_EPOCH_JD
}

mod leap_seconds {
    use super::{Tai, Tt, midnight_jd};
    use once_cell::sync::Lazy;

    pub const DATES: &[(i32, u32, u32)] = &[
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
    /// Last date through which IERS Bulletin C has ruled out a new leap second.
    pub const DATE_EXPIRES: (i32, u32, u32) = (2026, 6, 30);

    #[derive(Debug, Clone)]
    pub struct Data {
        pub starts: Tai,
        pub leap_seconds: Vec<LeapSecond>,
        pub expires: Tai,
        pub c2: f64,
    }
    /// `tai` is the start of the last regular second (23:59:59) before the
    /// inserted one; `delta_secs` is TAI − UTC up to that point.
    #[derive(Debug, Clone)]
    pub struct LeapSecond {
        pub tai: Tai,
        pub delta_secs: i32,
    }

    static COMPUTED: Lazy<Data> = Lazy::new(|| {
        let (y, m, d) = (1972, 1, 1);
        let starts = Tai(midnight_jd(y, m, d) + 10.0 / 86400.0);
        let leap_seconds: Vec<_> = (10..)
            .zip(DATES)
            .map(|(delta_secs, &(y, m, d))| LeapSecond {
                tai: Tai(midnight_jd(y, m, d) + (86399 + delta_secs) as f64 / 86400.0),
                delta_secs,
            })
            .collect();
        let (y, m, d) = DATE_EXPIRES;
        let final_delta = (DATES.len() + 10) as f64;
        let expires = Tai(midnight_jd(y, m, d) + (86399.0 + final_delta) / 86400.0);
        let c2 = final_delta - estimate(expires);
        Data {
            starts,
            leap_seconds,
            expires,
            c2,
        }
    });

    pub fn data() -> &'static Data {
        &COMPUTED
    }

    pub fn estimate<T: Into<Tt>>(tt: T) -> f64 {
        use std::f64::consts::PI;
        let tt = tt.into();
        let y = (tt.0 - 2451544.5) / 365.2425 + 2000.0;
        let t = (y - 1825.0) / 100.0;
        31.4115 * t * t + 284.8435805251424 * (2.0 * PI * (t + 0.75) / 14.0).cos()
    }
}

mod delta_t {
    use super::{Tt, leap_seconds};

    /// ΔT = TT − UT1 in seconds, from the Espenak & Meeus polynomials
    /// (NASA "Five Millennium Canon of Solar Eclipses").
    ///
    /// Only the 1860–1972 segments are tabulated; earlier dates use the
    /// long-term parabola.
    pub fn espenak_meeus(tt: Tt) -> f64 {
        let y = (tt.0 - 2451544.5) / 365.2425 + 2000.0;
        if y < 1860.0 {
            return leap_seconds::estimate(tt);
        }
        if y < 1900.0 {
            let t = y - 1860.0;
            return 7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
                - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233174.0;
        }
        if y < 1920.0 {
            let t = y - 1900.0;
            return -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4);
        }
        if y < 1941.0 {
            let t = y - 1920.0;
            return 21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3);
        }
        if y < 1961.0 {
            let t = y - 1950.0;
            return 29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0;
        }
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fmt(ut: Ut) -> String {
        ut.to_utc()
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string()
    }

    #[test]
    fn tdb_to_ut() {
        let tdb = Tdb(2451543.166666667);
        let ut = Ut::convert(tdb);
        // TT − UTC was 64.184 s at the end of 1999
        assert_eq!("1999-12-30 15:58:55.816", fmt(ut));
        let ut_midnight = Ut(ut.0 + (32.0 + 32.184) / 86400.0);
        assert_eq!("1999-12-30 16:00:00.000", fmt(ut_midnight));
    }

    #[test]
    fn leap_second_is_absorbed() {
        // TAI − UTC went from 36 s to 37 s at the end of 2016
        let before = Tai(midnight_jd(2016, 12, 31) + (43200.0 + 36.0) / 86400.0);
        let after = Tai(midnight_jd(2017, 1, 2) + 37.0 / 86400.0);
        assert_eq!("2016-12-31 12:00:00.000", fmt(Ut::convert(before)));
        assert_eq!("2017-01-02 00:00:00.000", fmt(Ut::convert(after)));
    }

    #[test]
    fn before_1972_is_continuous() {
        let starts = leap_seconds::data().starts;
        let utc = Ut::convert(starts);
        let ut1 = Ut::convert(Tai(starts.0 - 1e-6));
        assert!((utc.0 - ut1.0).abs() * 86400.0 < 0.5);
    }

    #[test]
    fn early_twentieth_century() {
        // ΔT was close to 0 s around 1902
        let tdb = Tdb(midnight_jd(1902, 1, 1));
        let ut = Ut::convert(tdb);
        assert!((tdb.0 - ut.0).abs() * 86400.0 < 5.0);
    }

    #[test]
    fn playing_with() {
        let tdb = Tdb(2462501.166666667 + 5.647029454550371); // 2030 小寒
        let ut = Ut::convert(tdb);
        assert!((ut.0 - 2462506.81319).abs() <= 30.0 / 86400.0);
    }

    #[test]
    fn utc_round_trip() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 6, 4, 49, 9).unwrap();
        assert_eq!(Some(instant), Ut::from_utc(instant).to_utc());
        let tdb = Tdb::from_ut(Ut::from_utc(instant));
        assert_eq!(Some(instant), Ut::convert(tdb).to_utc());
    }

    #[test]
    fn unrepresentable() {
        assert_eq!(None, Ut(f64::NAN).to_utc());
        assert_eq!(None, Ut(1e300).to_utc());
    }
}
