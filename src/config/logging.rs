//! Logger configuration.

use serde::Deserialize;

/// Raw logger settings as they appear in the config file.
///
/// Values stay strings here; `Logger::configure` parses them and rejects
/// anything it does not recognize. Empty strings select the defaults
/// (stdout, json, info).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// "", "stdout" or a file path.
    #[serde(default)]
    pub destination: String,
    /// "", "json" or "text".
    #[serde(default)]
    pub formatter: String,
    /// "", or one of trace, debug, info, warning, error, fatal, panic.
    #[serde(default)]
    pub level: String,
}

impl LogConfig {
    pub fn new(
        destination: impl Into<String>,
        formatter: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            formatter: formatter.into(),
            level: level.into(),
        }
    }
}
