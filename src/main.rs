use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use jieqi::chinese::Labels;
use jieqi::loader::{self, Loader, LocalFile, Remote};
use jieqi::provider::LazyDataset;
use jieqi::shell::Shell;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "jieqi",
    version,
    about = "Print the 24 solar terms of a year in a chosen timezone"
)]
struct Cli {
    #[clap(
        long,
        default_value = loader::DEFAULT_DATA_FILE,
        help = "Local ephemeris table (TDBtimes.txt format)"
    )]
    data_file: PathBuf,

    #[clap(
        long,
        default_value = loader::DEFAULT_URL,
        help = "Where to download the table when the local file is unusable"
    )]
    url: String,

    #[clap(long, help = "Never download the table")]
    offline: bool,

    #[clap(long, help = "Where to save a downloaded table [default: the --data-file path]")]
    cache: Option<PathBuf>,

    #[clap(long, help = "Do not save a downloaded table")]
    no_cache: bool,

    #[clap(long, default_value_t = loader::DEFAULT_TIMEOUT.as_secs(), help = "Download timeout in seconds")]
    timeout: u64,

    #[clap(long, default_value = "zhs", help = "Solar term names: zhs, zht or en")]
    labels: Labels,

    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn loaders(&self) -> Vec<Box<dyn Loader>> {
        let mut loaders: Vec<Box<dyn Loader>> = vec![Box::new(LocalFile::new(&self.data_file))];
        if !self.offline {
            let cache = if self.no_cache {
                None
            } else {
                Some(self.cache.clone().unwrap_or_else(|| self.data_file.clone()))
            };
            let remote =
                Remote::new(&self.url, Duration::from_secs(self.timeout)).with_cache(cache);
            loaders.push(Box::new(remote));
        }
        loaders
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .format_timestamp(None)
        .init();

    let source = LazyDataset::new(cli.loaders());
    Shell::new(io::stdin().lock(), io::stdout(), &source)
        .labels(cli.labels)
        .run()
        .context("terminal I/O failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_loader_constant() {
        let cli = Cli::parse_from(["jieqi"]);
        assert_eq!(loader::DEFAULT_TIMEOUT, Duration::from_secs(cli.timeout));
        let cli = Cli::parse_from(["jieqi", "--timeout", "5"]);
        assert_eq!(5, cli.timeout);
    }
}
