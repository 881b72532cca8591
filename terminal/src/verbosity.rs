use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How strictly failed checks are treated.
///
/// Every check that can fail carries its own severity, also expressed as a
/// `Verbosity`: the lowest level at which the failure is noticed at all.
/// Under [`Verbosity::Invariant`] and [`Verbosity::Crash`], noticed failures
/// are returned as errors, under [`Verbosity::Warning`] they are only logged.
///
/// The levels are ordered, `Suppress < Warning < Invariant < Crash`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Ignore all failures.
    Suppress,
    /// Log failures, but keep going.
    #[default]
    Warning,
    /// Return failures that are noticed at this level as errors.
    Invariant,
    /// Return every flagged failure as an error, even the weakest ones.
    Crash,
}

/// What to do about a failed check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reaction {
    Raise,
    Log,
    Ignore,
}

impl Verbosity {
    pub fn reaction(self, severity: Verbosity) -> Reaction {
        if self >= severity && self >= Verbosity::Invariant {
            Reaction::Raise
        } else if self >= severity {
            Reaction::Log
        } else {
            Reaction::Ignore
        }
    }

    /// Applies the policy to the outcome of a check.
    ///
    /// A raised failure stays an `Err`. A logged or ignored failure becomes
    /// `Ok(None)`, so the caller can turn it into a no-op.
    pub fn resolve<T, E: Display>(self, severity: Verbosity, result: Result<T, E>) -> Result<Option<T>, E> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => match self.reaction(severity) {
                Reaction::Raise => Err(err),
                Reaction::Log => {
                    warn!("{}", err);
                    Ok(None)
                }
                Reaction::Ignore => Ok(None),
            },
        }
    }

    /// Like [`Self::resolve()`], for checks that don't produce a value.
    ///
    /// Returns whether the check passed.
    pub fn check<E: Display>(self, severity: Verbosity, result: Result<(), E>) -> Result<bool, E> {
        self.resolve(severity, result).map(|passed| passed.is_some())
    }
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verbosity::Suppress => "suppress",
            Verbosity::Warning => "warning",
            Verbosity::Invariant => "invariant",
            Verbosity::Crash => "crash",
        };
        f.write_str(name)
    }
}

/// The error type for the [`FromStr`] instance of [`Verbosity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseVerbosityError(String);

impl std::error::Error for ParseVerbosityError {}

impl Display for ParseVerbosityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown verbosity '{}', expected one of suppress, warning, invariant, crash",
            self.0
        )
    }
}

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suppress" => Ok(Verbosity::Suppress),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "invariant" => Ok(Verbosity::Invariant),
            "crash" => Ok(Verbosity::Crash),
            _ => Err(ParseVerbosityError(String::from(s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [Verbosity; 4] = [
        Verbosity::Suppress,
        Verbosity::Warning,
        Verbosity::Invariant,
        Verbosity::Crash,
    ];

    #[test]
    fn reaction_table() {
        use Reaction::*;
        // Rows: current level, columns: severity of the check
        let expected = [
            [Log, Ignore, Ignore, Ignore],
            [Log, Log, Ignore, Ignore],
            [Raise, Raise, Raise, Ignore],
            [Raise, Raise, Raise, Raise],
        ];
        for (row, current) in LEVELS.iter().enumerate() {
            for (col, severity) in LEVELS.iter().enumerate() {
                assert_eq!(
                    current.reaction(*severity),
                    expected[row][col],
                    "{} / {}",
                    current,
                    severity
                );
            }
        }
    }

    #[test]
    fn resolve_maps_failures() {
        let failure: Result<u8, String> = Err(String::from("nope"));
        assert_eq!(Verbosity::Suppress.resolve(Verbosity::Warning, failure.clone()), Ok(None));
        assert_eq!(Verbosity::Warning.resolve(Verbosity::Warning, failure.clone()), Ok(None));
        assert!(Verbosity::Invariant.resolve(Verbosity::Warning, failure.clone()).is_err());
        assert_eq!(Verbosity::Invariant.resolve(Verbosity::Crash, failure), Ok(None));
        assert_eq!(Verbosity::Crash.resolve(Verbosity::Crash, Ok::<u8, String>(3)), Ok(Some(3)));
    }

    #[test]
    fn parse_and_display() {
        for level in LEVELS {
            assert_eq!(level.to_string().parse::<Verbosity>(), Ok(level));
        }
        assert!("loud".parse::<Verbosity>().is_err());
    }
}
