//! Acquisition of the ephemeris table: a local file first, a download second.
//!
//! Each way of obtaining a [`Dataset`] is a [`Loader`]; [`load_first`] tries
//! an ordered list of them and keeps the first success.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chinese::ephemeris::Dataset;
use crate::error::{Error, Result};

/// File name looked up in the working directory by default.
pub const DEFAULT_DATA_FILE: &str = "TDBtimes.txt";

/// Where the table is fetched from when no local copy exists.
pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/ytliu0/ChineseCalendar/master/TDBtimes.txt";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One strategy for obtaining the ephemeris table.
pub trait Loader {
    /// Short human-readable name of the source, used in diagnostics.
    fn describe(&self) -> String;
    fn load(&self) -> Result<Dataset>;
}

/// Reads the table from a file on disk.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Loader for LocalFile {
    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }

    fn load(&self) -> Result<Dataset> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(Dataset::parse(&raw)?)
    }
}

/// Downloads the table over HTTP(S), optionally saving a copy for the next
/// run.
#[derive(Debug, Clone)]
pub struct Remote {
    url: String,
    timeout: Duration,
    cache: Option<PathBuf>,
}

impl Remote {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Option<PathBuf>) -> Self {
        self.cache = cache;
        self
    }

    fn fetch(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to create HTTP client: {}", e)))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| Error::Http(format!("failed to download {}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "download failed for {}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        response
            .text()
            .map_err(|e| Error::Http(format!("failed to read response: {}", e)))
    }
}

impl Loader for Remote {
    fn describe(&self) -> String {
        format!("remote {}", self.url)
    }

    fn load(&self) -> Result<Dataset> {
        let raw = self.fetch()?;
        let dataset = Dataset::parse(&raw)?;
        if let Some(cache) = &self.cache {
            match write_atomically(cache, &raw) {
                Ok(()) => log::info!("saved ephemeris table to {}", cache.display()),
                Err(e) => log::warn!("could not save ephemeris table to {}: {}", cache.display(), e),
            }
        }
        Ok(dataset)
    }
}

/// Writes to a temporary sibling first so a partial file never replaces a good
/// one.
fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(temp_path, path)
}

/// Tries each loader in order and returns the first data set obtained.
///
/// Every failure is logged; if all of them fail the result is
/// [`Error::EphemerisUnavailable`] with one entry per attempt.
pub fn load_first(loaders: &[Box<dyn Loader>]) -> Result<Dataset> {
    let mut attempts = Vec::with_capacity(loaders.len());
    for loader in loaders {
        let source = loader.describe();
        match loader.load() {
            Ok(dataset) => {
                log::info!(
                    "loaded ephemeris from {} (years {:?})",
                    source,
                    dataset.years()
                );
                return Ok(dataset);
            }
            Err(e) => {
                log::warn!("could not load ephemeris from {}: {}", source, e);
                attempts.push(format!("{}: {}", source, e));
            }
        }
    }
    Err(Error::EphemerisUnavailable { attempts })
}
