//! Building and printing the yearly solar-term table.

use std::io::{self, Write};

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::chinese::fmt::{max_width, pad};
use crate::chinese::{Labels, SolarTermEvent};
use crate::error::{Error, Result};
use crate::provider::EphemerisProvider;
use crate::timezone;

/// Display format of local timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A year and the timezone to show it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub year: i32,
    pub timezone: String,
}

impl Query {
    pub fn new(year: i32, timezone: impl Into<String>) -> Self {
        Self {
            year,
            timezone: timezone.into(),
        }
    }

    pub fn generate(&self, provider: &dyn EphemerisProvider) -> Result<Report> {
        generate(provider, self.year, &self.timezone)
    }
}

/// One row of a [`Report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub event: SolarTermEvent,
    pub local: DateTime<Tz>,
}

/// Solar terms of one calendar year, in the query's timezone and in
/// instant order.
#[derive(Debug, Clone)]
pub struct Report {
    pub year: i32,
    pub timezone: Tz,
    /// Local 00:00 of January 1st, inclusive.
    pub start: DateTime<Utc>,
    /// Local 00:00 of December 31st, exclusive.
    pub end: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

/// Collects the solar terms between local January 1st and local December
/// 31st (both at 00:00) of `year` in the timezone named by `timezone_id`.
///
/// Unknown timezones are replaced by the default one. An empty result is not
/// an error.
pub fn generate(provider: &dyn EphemerisProvider, year: i32, timezone_id: &str) -> Result<Report> {
    let tz = timezone::resolve(timezone_id);
    let start = local_midnight(&tz, year, 1, 1)?.with_timezone(&Utc);
    let end = local_midnight(&tz, year, 12, 31)?.with_timezone(&Utc);
    log::debug!("searching {} to {} for {} in {}", start, end, year, tz);

    let mut events = provider
        .find_events(start, end)
        .map_err(|e| match e {
            Error::EphemerisUnavailable { .. } | Error::Computation(_) => e,
            other => Error::Computation(other.to_string()),
        })?;
    events.sort_by_key(|ev| ev.instant);

    let entries = events
        .into_iter()
        .map(|event| ReportEntry {
            local: event.instant.with_timezone(&tz),
            event,
        })
        .collect();
    Ok(Report {
        year,
        timezone: tz,
        start,
        end,
        entries,
    })
}

/// First existing local time at or after 00:00 of the given date. A folded
/// midnight resolves to the earlier instant.
fn local_midnight(tz: &Tz, year: i32, month: u32, day: u32) -> Result<DateTime<Tz>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::Computation(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
    })?;
    let mut naive = date.and_time(NaiveTime::MIN);
    // transitions skip at most a few hours
    for _ in 0..(24 * 4) {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return Ok(dt),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest),
            LocalResult::None => naive += TimeDelta::minutes(15),
        }
    }
    Err(Error::Computation(format!(
        "no local time exists on {date} in {tz}"
    )))
}

impl Report {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes a caption and a bordered two-column table. The header is always
    /// printed, even with no rows.
    pub fn render<W: Write>(&self, out: &mut W, labels: Labels) -> io::Result<()> {
        const TERM: &str = "Term";
        const LOCAL: &str = "Local time";
        let term_width = max_width(labels).max(TERM.len());
        let time_width = "0000-00-00 00:00:00".len();
        let rule = format!("+-{}-+-{}-+", "-".repeat(term_width), "-".repeat(time_width));

        writeln!(
            out,
            "{y}-01-01 to {y}-12-31 solar terms ({tz})",
            y = self.year,
            tz = self.timezone
        )?;
        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "| {} | {} |",
            pad(TERM, term_width),
            pad(LOCAL, time_width)
        )?;
        writeln!(out, "{rule}")?;
        for entry in &self.entries {
            writeln!(
                out,
                "| {} | {} |",
                pad(entry.event.label(labels), term_width),
                entry.local.format(TIMESTAMP_FORMAT)
            )?;
        }
        writeln!(out, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::SolarTerm;
    use crate::chinese::ephemeris::{Dataset, fixtures};
    use chrono::{Datelike, Timelike};
    use proptest::prelude::*;

    /// 24 events spaced evenly through the window, starting at Slight Cold.
    struct Stub;

    impl EphemerisProvider for Stub {
        fn find_events(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<SolarTermEvent>> {
            let step = (end - start) / 25;
            Ok((0..24)
                .map(|i| {
                    let term = SolarTerm::from_index((19 + i) % 24).unwrap();
                    SolarTermEvent::new(term, start + step * (i as i32 + 1))
                })
                .collect())
        }
    }

    struct Empty;

    impl EphemerisProvider for Empty {
        fn find_events(&self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<SolarTermEvent>> {
            Ok(Vec::new())
        }
    }

    struct Broken;

    impl EphemerisProvider for Broken {
        fn find_events(&self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<SolarTermEvent>> {
            Err(Error::Http("connection reset".to_owned()))
        }
    }

    /// Returns events newest first.
    struct Reversed;

    impl EphemerisProvider for Reversed {
        fn find_events(&self, s: DateTime<Utc>, e: DateTime<Utc>) -> Result<Vec<SolarTermEvent>> {
            let mut events = Stub.find_events(s, e)?;
            events.reverse();
            Ok(events)
        }
    }

    #[test]
    fn window_is_local_midnight() {
        let report = generate(&Empty, 2024, "Asia/Shanghai").unwrap();
        assert_eq!(
            Utc.with_ymd_and_hms(2023, 12, 31, 16, 0, 0).unwrap(),
            report.start
        );
        assert_eq!(
            Utc.with_ymd_and_hms(2024, 12, 30, 16, 0, 0).unwrap(),
            report.end
        );
        assert!(report.is_empty());
    }

    #[test]
    fn unknown_timezone_uses_default() {
        let report = generate(&Stub, 2024, "Atlantis/Capital").unwrap();
        assert_eq!("America/New_York", report.timezone.name());
        assert_eq!(24, report.len());
    }

    #[test]
    fn provider_errors_become_computation_errors() {
        let err = generate(&Broken, 2024, "UTC").unwrap_err();
        assert!(matches!(err, Error::Computation(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn out_of_order_events_are_sorted() {
        let report = generate(&Reversed, 2024, "UTC").unwrap();
        assert_eq!(SolarTerm::SlightCold, report.entries[0].event.term);
        assert!(report.entries.windows(2).all(|w| w[0].local <= w[1].local));
    }

    #[test]
    fn midnight_in_dst_fold() {
        // Havana fell back from 01:00 to 00:00 on 2014-11-02
        let tz: Tz = "America/Havana".parse().unwrap();
        let dt = local_midnight(&tz, 2014, 11, 2).unwrap();
        assert_eq!(
            Utc.with_ymd_and_hms(2014, 11, 2, 4, 0, 0).unwrap(),
            dt.with_timezone(&Utc)
        );
    }

    #[test]
    fn midnight_in_dst_gap() {
        // Havana skipped from 00:00 to 01:00 on 2014-03-09
        let tz: Tz = "America/Havana".parse().unwrap();
        let dt = local_midnight(&tz, 2014, 3, 9).unwrap();
        assert_eq!(1, dt.hour());
        let tz: Tz = "America/Santiago".parse().unwrap();
        let dt = local_midnight(&tz, 2024, 1, 1).unwrap();
        assert_eq!(0, dt.hour());
    }

    #[test]
    fn shanghai_2024() {
        let dataset = Dataset::parse(&fixtures::dataset_text(2023..=2025)).unwrap();
        let report = Query::new(2024, "Asia/Shanghai").generate(&dataset).unwrap();
        assert_eq!(24, report.len());

        let first = &report.entries[0];
        assert_eq!(SolarTerm::SlightCold, first.event.term);
        assert_eq!((2024, 1), (first.local.year(), first.local.month()));
        assert!(first.local.day() <= 10);

        let last = report.entries.last().unwrap();
        assert_eq!(SolarTerm::WinterSolstice, last.event.term);
        assert_eq!((2024, 12), (last.local.year(), last.local.month()));
        assert!(last.local.day() >= 15);

        for pair in report.entries.windows(2) {
            assert_eq!((pair[0].event.index() + 1) % 24, pair[1].event.index());
        }
    }

    #[test]
    fn render_table() {
        let report = generate(&Stub, 2024, "UTC").unwrap();
        let mut out = Vec::new();
        report.render(&mut out, Labels::Simplified).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!("2024-01-01 to 2024-12-31 solar terms (UTC)", lines[0]);
        assert_eq!("+------+---------------------+", lines[1]);
        assert_eq!("| Term | Local time          |", lines[2]);
        assert!(lines[4].starts_with("| 小寒 | 2024-01-"));
        assert_eq!(4 + 24 + 1, lines.len());
        assert_eq!(lines[1], *lines.last().unwrap());
    }

    #[test]
    fn render_empty() {
        let report = generate(&Empty, 1900, "Europe/London").unwrap();
        let mut out = Vec::new();
        report.render(&mut out, Labels::English).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(5, text.lines().count());
        assert!(text.contains("| Term "));
    }

    proptest! {
        #[test]
        fn full_year_is_ordered(year in 1900i32..=2100, choice in 0usize..3) {
            let tz = crate::timezone::TimezoneChoice::ALL[choice].identifier();
            let report = generate(&Stub, year, tz).unwrap();
            prop_assert_eq!(24, report.len());
            prop_assert!(report.entries.windows(2).all(|w| w[0].event.instant <= w[1].event.instant));
            prop_assert!(report.entries.iter().all(|e| (report.start..report.end).contains(&e.event.instant)));
        }
    }
}
