#[cfg(feature = "cli")]
use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level, from quietest to loudest.
///
/// ```rust
/// use haplonet::Verbosity;
/// use log::LevelFilter;
/// assert_eq!(Verbosity::Debug.to_string(), "debug");
/// assert_eq!(LevelFilter::from(Verbosity::default()), LevelFilter::Info);
/// assert!(Verbosity::Warn < Verbosity::Trace);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let lowercase = format!("{self:?}").to_lowercase();
        write!(f, "{lowercase}")
    }
}
