//! Lists the 24 solar terms (二十四節氣) of a Gregorian year in a chosen
//! timezone.
//!
//! Solar-term instants come from a precomputed ephemeris table rather than
//! from an astronomical model: the table is loaded once (see [`loader`]),
//! its TDB instants converted to UTC (see [`time_scales`]), and every query
//! just picks the crossings inside a local-time window (see [`report`]).
//!
//! # Examples
//!
//! Any [`EphemerisProvider`] can drive a report:
//!
//! ```
//! use chrono::{DateTime, TimeDelta, Utc};
//! use jieqi::chinese::{Labels, SolarTerm, SolarTermEvent};
//! use jieqi::{EphemerisProvider, report};
//!
//! struct Fixed;
//!
//! impl EphemerisProvider for Fixed {
//!     fn find_events(
//!         &self,
//!         start: DateTime<Utc>,
//!         _end: DateTime<Utc>,
//!     ) -> jieqi::Result<Vec<SolarTermEvent>> {
//!         Ok(vec![SolarTermEvent::new(SolarTerm::SlightCold, start + TimeDelta::days(5))])
//!     }
//! }
//!
//! let report = report::generate(&Fixed, 2024, "Asia/Shanghai").unwrap();
//! assert_eq!("2024-01-06 00:00:00", report.entries[0].local.format("%Y-%m-%d %H:%M:%S").to_string());
//! assert_eq!("小寒", report.entries[0].event.label(Labels::Simplified));
//! ```
//!
//! The interactive program wires a [`provider::LazyDataset`] into a
//! [`shell::Shell`]:
//!
//! ```no_run
//! use std::io;
//! use std::time::Duration;
//! use jieqi::loader::{self, Loader, LocalFile, Remote};
//! use jieqi::provider::LazyDataset;
//! use jieqi::shell::Shell;
//!
//! let loaders: Vec<Box<dyn Loader>> = vec![
//!     Box::new(LocalFile::new(loader::DEFAULT_DATA_FILE)),
//!     Box::new(Remote::new(loader::DEFAULT_URL, Duration::from_secs(30))),
//! ];
//! let source = LazyDataset::new(loaders);
//! Shell::new(io::stdin().lock(), io::stdout(), &source).run().unwrap();
//! ```

pub mod chinese;
pub mod error;
pub mod loader;
pub mod provider;
pub mod report;
pub mod shell;
pub mod time_scales;
pub mod timezone;

pub use error::{Error, Result};
pub use provider::{EphemerisProvider, EphemerisSource};
pub use report::{Query, Report};
