//! Timezone validation and the fixed menu offered by the shell.

use chrono_tz::Tz;

use crate::error::Error;

/// Identifier substituted for anything unrecognized.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

const DEFAULT_TZ: Tz = Tz::America__New_York;

/// Resolves an IANA timezone identifier, falling back to
/// [`DEFAULT_TIMEZONE`] with a warning when it is unknown.
///
/// Never fails, and resolving the name of a resolved zone gives the same
/// zone back.
///
/// # Example
///
/// ```
/// use jieqi::timezone::resolve;
///
/// assert_eq!("Asia/Shanghai", resolve("Asia/Shanghai").name());
/// assert_eq!("America/New_York", resolve("Mars/Olympus_Mons").name());
/// ```
pub fn resolve(identifier: &str) -> Tz {
    match identifier.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            let err = Error::UnknownTimezone(identifier.to_owned());
            log::warn!("{}, using default '{}'", err, DEFAULT_TIMEZONE);
            DEFAULT_TZ
        }
    }
}

/// The numbered timezone menu.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TimezoneChoice {
    #[default]
    NewYork,
    Shanghai,
    London,
}

impl TimezoneChoice {
    /// Menu order; option `n` is `ALL[n - 1]`.
    pub const ALL: [TimezoneChoice; 3] = [Self::NewYork, Self::Shanghai, Self::London];

    /// Maps a menu answer to a choice. Empty or unrecognized input selects
    /// the default.
    ///
    /// # Example
    ///
    /// ```
    /// use jieqi::timezone::TimezoneChoice;
    ///
    /// assert_eq!(TimezoneChoice::Shanghai, TimezoneChoice::from_input("2"));
    /// assert_eq!(TimezoneChoice::NewYork, TimezoneChoice::from_input(""));
    /// ```
    pub fn from_input(input: &str) -> Self {
        match input.trim() {
            "1" => Self::NewYork,
            "2" => Self::Shanghai,
            "3" => Self::London,
            _ => Self::default(),
        }
    }

    /// Menu number, starting at 1.
    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::NewYork => "America/New_York",
            Self::Shanghai => "Asia/Shanghai",
            Self::London => "Europe/London",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NewYork => "US Eastern time",
            Self::Shanghai => "China Standard Time",
            Self::London => "UK time",
        }
    }

    pub fn tz(&self) -> Tz {
        resolve(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_zones_unchanged() {
        for id in ["Asia/Shanghai", "Europe/London", "UTC", "Asia/Tokyo"] {
            assert_eq!(id, resolve(id).name());
        }
        assert_eq!("Asia/Shanghai", resolve("  Asia/Shanghai\n").name());
    }

    #[test]
    fn unknown_zones_fall_back() {
        for id in ["", "Nowhere", "Asia/Atlantis", "UTC+8"] {
            assert_eq!(DEFAULT_TIMEZONE, resolve(id).name(), "{id:?}");
        }
    }

    #[test]
    fn menu() {
        for (std, input) in [
            (TimezoneChoice::NewYork, "1"),
            (TimezoneChoice::Shanghai, " 2 "),
            (TimezoneChoice::London, "3"),
            (TimezoneChoice::NewYork, ""),
            (TimezoneChoice::NewYork, "4"),
            (TimezoneChoice::NewYork, "London"),
        ] {
            assert_eq!(std, TimezoneChoice::from_input(input), "{input:?}");
        }
        assert_eq!(DEFAULT_TIMEZONE, TimezoneChoice::default().identifier());
        for (i, choice) in TimezoneChoice::ALL.iter().enumerate() {
            assert_eq!(i + 1, choice.number());
            assert_eq!(choice.identifier(), choice.tz().name());
        }
    }

    proptest! {
        #[test]
        fn resolve_is_idempotent(id in ".{0,24}") {
            let once = resolve(&id);
            prop_assert_eq!(once, resolve(once.name()));
        }

        #[test]
        fn never_an_error(id in "[A-Za-z_/]{0,30}") {
            let tz = resolve(&id);
            prop_assert!(tz == DEFAULT_TZ || id.trim().parse::<Tz>().ok() == Some(tz));
        }
    }
}
