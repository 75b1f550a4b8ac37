//! The interactive year / timezone prompt loop.

use std::io::{self, BufRead, Write};

use crate::chinese::Labels;
use crate::error::{Error, Result};
use crate::provider::EphemerisSource;
use crate::report::Query;
use crate::timezone::TimezoneChoice;

/// Years accepted at the prompt.
pub const YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

const QUIT_TOKENS: &[&str] = &["q", "quit", "exit"];

/// Parses a year typed at the prompt.
///
/// # Example
///
/// ```
/// use jieqi::shell::parse_year;
///
/// assert_eq!(2024, parse_year(" 2024\n").unwrap());
/// assert!(parse_year("2101").is_err());
/// assert!(parse_year("abc").is_err());
/// ```
pub fn parse_year(input: &str) -> Result<i32> {
    let input = input.trim();
    let invalid = |reason: String| Error::InvalidYearInput {
        input: input.to_owned(),
        reason,
    };
    let year: i32 = input
        .parse()
        .map_err(|_| invalid("not a number".to_owned()))?;
    if !YEARS.contains(&year) {
        return Err(invalid(format!(
            "must be between {} and {}",
            YEARS.start(),
            YEARS.end()
        )));
    }
    Ok(year)
}

/// `true` for `q`, `quit` or `exit` in any case.
pub fn is_quit(input: &str) -> bool {
    let input = input.trim();
    QUIT_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(input))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    AwaitingYear,
    AwaitingTimezoneChoice(i32),
    Reporting(Query),
    Exited,
}

/// Reads queries from `input`, writes reports and diagnostics to `output`.
///
/// Errors from a single query are printed and the loop goes on; only I/O
/// errors on the streams themselves end [`Shell::run`] early.
pub struct Shell<'a, R, W> {
    input: R,
    output: W,
    source: &'a dyn EphemerisSource,
    labels: Labels,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(input: R, output: W, source: &'a dyn EphemerisSource) -> Self {
        Self {
            input,
            output,
            source,
            labels: Labels::default(),
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Runs until a quit token or the end of input.
    pub fn run(mut self) -> io::Result<()> {
        writeln!(self.output, "24 solar terms")?;
        writeln!(
            self.output,
            "Enter a year (for example 2024) to list its solar terms."
        )?;
        let mut state = State::AwaitingYear;
        while state != State::Exited {
            state = match state {
                State::AwaitingYear => self.await_year()?,
                State::AwaitingTimezoneChoice(year) => self.await_timezone(year)?,
                State::Reporting(query) => self.report(&query)?,
                State::Exited => State::Exited,
            };
        }
        Ok(())
    }

    fn await_year(&mut self) -> io::Result<State> {
        write!(
            self.output,
            "\nEnter a year ({}-{}), or q to quit: ",
            YEARS.start(),
            YEARS.end()
        )?;
        let Some(line) = self.read_line()? else {
            writeln!(self.output)?;
            return Ok(State::Exited);
        };
        if is_quit(&line) {
            writeln!(self.output, "Goodbye!")?;
            return Ok(State::Exited);
        }
        match parse_year(&line) {
            Ok(year) => Ok(State::AwaitingTimezoneChoice(year)),
            Err(e) => {
                log::debug!("rejected year input: {}", e);
                writeln!(self.output, "error: {}", e)?;
                Ok(State::AwaitingYear)
            }
        }
    }

    fn await_timezone(&mut self, year: i32) -> io::Result<State> {
        writeln!(self.output, "\nSelect a timezone:")?;
        for choice in TimezoneChoice::ALL {
            let default = if choice == TimezoneChoice::default() {
                " [default]"
            } else {
                ""
            };
            writeln!(
                self.output,
                "{}. {} ({}){}",
                choice.number(),
                choice.description(),
                choice.identifier(),
                default
            )?;
        }
        write!(
            self.output,
            "Select timezone [1-{}], Enter for default: ",
            TimezoneChoice::ALL.len()
        )?;
        let line = self.read_line()?.unwrap_or_default();
        let choice = TimezoneChoice::from_input(&line);
        Ok(State::Reporting(Query::new(year, choice.identifier())))
    }

    fn report(&mut self, query: &Query) -> io::Result<State> {
        let result = self
            .source
            .provider()
            .and_then(|provider| query.generate(provider));
        match result {
            Ok(report) => {
                writeln!(self.output)?;
                report.render(&mut self.output, self.labels)?;
                if report.is_empty() {
                    log::warn!("no solar terms found for {}", query.year);
                }
            }
            Err(e) => {
                log::error!("query {:?} failed: {}", query, e);
                writeln!(self.output, "error: {}", e)?;
            }
        }
        Ok(State::AwaitingYear)
    }

    /// Bytes that are not UTF-8 become U+FFFD, so they fail validation like
    /// any other unrecognized answer.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
