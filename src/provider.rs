//! The seam between report generation and wherever solar-term instants come
//! from.

use chrono::{DateTime, Utc};
use once_cell::unsync::OnceCell;

use crate::chinese::SolarTermEvent;
use crate::chinese::ephemeris::Dataset;
use crate::error::Result;
use crate::loader::{self, Loader};

/// Anything that can list the solar-term crossings inside a time window.
///
/// Implementations must be deterministic for a fixed data set and window and
/// return events in non-decreasing instant order.
pub trait EphemerisProvider {
    fn find_events(&self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> Result<Vec<SolarTermEvent>>;
}

/// Hands out a provider, acquiring it on demand.
pub trait EphemerisSource {
    fn provider(&self) -> Result<&dyn EphemerisProvider>;
}

/// A [`Dataset`] loaded on first use through an ordered list of loaders and
/// kept for the rest of the process.
///
/// A failed load is not remembered; the next call tries the loaders again.
pub struct LazyDataset {
    loaders: Vec<Box<dyn Loader>>,
    dataset: OnceCell<Dataset>,
}

impl LazyDataset {
    pub fn new(loaders: Vec<Box<dyn Loader>>) -> Self {
        Self {
            loaders,
            dataset: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }
}

impl EphemerisSource for LazyDataset {
    fn provider(&self) -> Result<&dyn EphemerisProvider> {
        let dataset = self
            .dataset
            .get_or_try_init(|| loader::load_first(&self.loaders))?;
        Ok(dataset)
    }
}

impl EphemerisSource for Dataset {
    fn provider(&self) -> Result<&dyn EphemerisProvider> {
        Ok(self)
    }
}
