//! Output destinations and the log file handle.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use super::LoggerError;

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Empty or "stdout" (any case) selects standard output, anything else a file path.
    pub fn parse(dst: &str) -> Self {
        if dst.is_empty() || dst.eq_ignore_ascii_case("stdout") {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(dst))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Open log file backing a file destination.
///
/// The logger writes through a shared reference to the same descriptor;
/// the descriptor is released once the logger stops writing to it and this
/// handle is closed or dropped.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: Arc<File>,
}

impl LogFile {
    /// Opens `path` for appending, creating it with mode 0644 if absent.
    pub fn open(path: &Path) -> Result<Self, LoggerError> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options
            .open(path)
            .map_err(|source| LoggerError::OpenDestination {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the file to disk and releases this handle.
    pub fn close(self) -> io::Result<()> {
        self.file.sync_all()
    }

    pub(crate) fn share(&self) -> Output {
        Output::File {
            path: self.path.clone(),
            file: Arc::clone(&self.file),
        }
    }
}

/// Sink currently attached to the formatter layer.
#[derive(Debug, Clone, Default)]
pub(crate) enum Output {
    #[default]
    Stdout,
    File { path: PathBuf, file: Arc<File> },
}

impl Output {
    pub(crate) fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Output::Stdout => BoxMakeWriter::new(io::stdout),
            Output::File { file, .. } => BoxMakeWriter::new(Arc::clone(file)),
        }
    }

    /// Colors only make sense on an interactive console.
    pub(crate) fn supports_ansi(&self) -> bool {
        match self {
            Output::Stdout => io::stdout().is_terminal(),
            Output::File { .. } => false,
        }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Output::Stdout => None,
            Output::File { path, .. } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stdout() {
        assert_eq!(Destination::parse(""), Destination::Stdout);
        assert_eq!(Destination::parse("stdout"), Destination::Stdout);
        assert_eq!(Destination::parse("STDOUT"), Destination::Stdout);
    }

    #[test]
    fn test_parse_file() {
        assert_eq!(
            Destination::parse("/var/log/app.log"),
            Destination::File(PathBuf::from("/var/log/app.log"))
        );
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let file = LogFile::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(file.path(), path);
        file.close().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_open_uses_mode_0644() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        LogFile::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        // umask may only clear bits
        assert_eq!(mode & 0o777 & !0o644, 0);
        assert_ne!(mode & 0o600, 0);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");

        let err = LogFile::open(&path).unwrap_err();

        assert!(err.is_io());
        let message = err.to_string();
        assert!(message.contains("unable to open the file"));
        assert!(message.contains("app.log"));
    }
}
