//! Message formatters.

use std::fmt;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, fmt as tfmt};

use super::LoggerError;

/// Shape of each emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formatter {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable line with timestamp, level, target and fields.
    Text,
}

impl Formatter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formatter::Json => "json",
            Formatter::Text => "text",
        }
    }

    /// Builds the `fmt` layer writing lines of this shape to `writer`.
    pub(crate) fn layer<S>(
        &self,
        writer: BoxMakeWriter,
        ansi: bool,
    ) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        let layer = tfmt::layer().with_writer(writer);
        match self {
            Formatter::Json => layer.json().boxed(),
            Formatter::Text => layer.with_ansi(ansi).boxed(),
        }
    }
}

impl FromStr for Formatter {
    type Err = LoggerError;

    /// Empty names select the JSON formatter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "json" => Ok(Formatter::Json),
            "text" => Ok(Formatter::Text),
            _ => Err(LoggerError::InvalidFormatter(s.to_string())),
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatters() {
        assert_eq!("".parse::<Formatter>().unwrap(), Formatter::Json);
        assert_eq!("json".parse::<Formatter>().unwrap(), Formatter::Json);
        assert_eq!("JSON".parse::<Formatter>().unwrap(), Formatter::Json);
        assert_eq!("text".parse::<Formatter>().unwrap(), Formatter::Text);
        assert_eq!("Text".parse::<Formatter>().unwrap(), Formatter::Text);
    }

    #[test]
    fn test_parse_unknown_formatter() {
        let err = "xml".parse::<Formatter>().unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "unknown logger formatter 'xml'");
    }
}
