//! Severity levels and their mapping onto `tracing` levels.

use std::fmt;
use std::str::FromStr;

use tracing::Level;

use super::LoggerError;

/// Minimum importance a message must have to be emitted.
///
/// Ordered least to most severe. `Fatal` and `Panic` have no `tracing`
/// counterpart; they are emitted as `ERROR` events carrying a
/// [`SEVERITY_FIELD`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

/// Name of the event field that lifts an `ERROR` event to fatal or panic.
pub const SEVERITY_FIELD: &str = "severity";

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// Parses a configured level, treating an empty string as `info`.
    pub fn from_config(name: &str) -> Result<Self, LoggerError> {
        if name.is_empty() {
            return Ok(Severity::Info);
        }
        name.parse()
    }

    /// The `tracing` level used to emit messages of this severity.
    pub fn tracing_level(&self) -> Level {
        match self {
            Severity::Trace => Level::TRACE,
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warning => Level::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => Level::ERROR,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        Severity::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(Severity::Panic)
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Severity::Trace,
            Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
    }

    #[test]
    fn test_parse_warn_alias() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
    }

    #[test]
    fn test_parse_unknown_level() {
        let err = "verbose".parse::<Severity>().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("'verbose'"));
    }

    #[test]
    fn test_empty_name_is_rejected_by_from_str() {
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn test_from_config_defaults_to_info() {
        assert_eq!(Severity::from_config("").unwrap(), Severity::Info);
        assert_eq!(Severity::from_config("fatal").unwrap(), Severity::Fatal);
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
        assert!(Severity::Fatal < Severity::Panic);
    }

    #[test]
    fn test_u8_conversion() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_u8(severity as u8), severity);
        }
        assert_eq!(Severity::from_u8(200), Severity::Panic);
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(Severity::Warning.tracing_level(), Level::WARN);
        assert_eq!(Severity::Panic.tracing_level(), Level::ERROR);
        assert_eq!(Severity::from(Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(Level::ERROR), Severity::Error);
    }
}
