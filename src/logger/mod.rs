//! Application logger: destination, formatter and severity threshold.
//!
//! A [`Logger`] is an explicit, cloneable handle over a `tracing` subscriber
//! built from two layers: a severity gate reading a shared threshold, and a
//! reloadable `fmt` layer that is rebuilt whenever the formatter or the
//! output changes. The application installs the subscriber once (see
//! [`Logger::init`]) and passes the handle to whoever needs to reconfigure it.

mod destination;
mod error;
mod format;
mod gate;
mod severity;

pub use destination::{Destination, LogFile};
pub use error::LoggerError;
pub use format::Formatter;
pub use severity::{SEVERITY_FIELD, Severity};

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, reload};

use crate::config::LogConfig;
use destination::Output;
use gate::SeverityGate;

type Base = Layered<SeverityGate, Registry>;
type FormatLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Subscriber driven by a [`Logger`].
pub type LoggerSubscriber = Layered<reload::Layer<FormatLayer, Base>, Base>;

/// Shared handle to the application logger.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    threshold: Arc<AtomicU8>,
    layer: reload::Handle<FormatLayer, Base>,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    formatter: Formatter,
    output: Output,
}

impl State {
    fn layer(&self) -> FormatLayer {
        self.formatter
            .layer(self.output.make_writer(), self.output.supports_ansi())
    }
}

impl Logger {
    /// Creates a logger writing JSON to stdout at `info`, and the subscriber it controls.
    ///
    /// The subscriber is inert until installed, either globally or with
    /// `tracing::subscriber::with_default`.
    pub fn new() -> (Self, LoggerSubscriber) {
        let state = State::default();
        let threshold = Arc::new(AtomicU8::new(Severity::default() as u8));

        let (layer, handle): (
            reload::Layer<FormatLayer, Base>,
            reload::Handle<FormatLayer, Base>,
        ) = reload::Layer::new(state.layer());

        let subscriber = Registry::default()
            .with(SeverityGate::new(Arc::clone(&threshold)))
            .with(layer);

        let logger = Logger {
            inner: Arc::new(Inner {
                threshold,
                layer: handle,
                state: Mutex::new(state),
            }),
        };

        (logger, subscriber)
    }

    /// Creates a logger and installs its subscriber as the global default.
    ///
    /// Records emitted through the `log` crate are forwarded as well.
    pub fn init() -> Result<Self, LoggerError> {
        let (logger, subscriber) = Self::new();
        subscriber
            .try_init()
            .map_err(|e| LoggerError::Init(e.to_string()))?;
        Ok(logger)
    }

    /// Applies destination, formatter and level from `config`.
    ///
    /// Names are validated before anything changes, so an error leaves the
    /// logger as it was and creates no file. Returns the open log file when
    /// the destination is a path; the caller owns it until shutdown.
    pub fn configure(&self, config: &LogConfig) -> Result<Option<LogFile>, LoggerError> {
        let formatter: Formatter = config.formatter.parse()?;
        let severity = Severity::from_config(&config.level)?;

        let file = self.set_destination(&config.destination)?;
        self.use_formatter(formatter)?;
        self.set_severity(severity);

        debug!(level = %config.level, "logger level is set");
        debug!(destination = %config.destination, "logger destination is set");
        debug!(formatter = %config.formatter, "logger formatter is set");

        Ok(file)
    }

    /// Routes output to stdout or to the file named by `dst`.
    pub fn set_destination(&self, dst: &str) -> Result<Option<LogFile>, LoggerError> {
        match Destination::parse(dst) {
            Destination::Stdout => {
                self.use_stdout()?;
                Ok(None)
            }
            Destination::File(path) => {
                let file = LogFile::open(&path)?;
                self.set_output(file.share())?;
                Ok(Some(file))
            }
        }
    }

    /// Selects the formatter by name: "" or "json", or "text".
    pub fn set_formatter(&self, name: &str) -> Result<(), LoggerError> {
        let formatter = name.parse()?;
        self.use_formatter(formatter)
    }

    /// Sets the threshold by name; an empty name means `info`.
    ///
    /// An unknown name leaves the current threshold untouched.
    pub fn set_level(&self, name: &str) -> Result<(), LoggerError> {
        let severity = Severity::from_config(name)?;
        self.set_severity(severity);
        Ok(())
    }

    pub fn set_severity(&self, severity: Severity) {
        self.inner
            .threshold
            .store(severity as u8, Ordering::Relaxed);
    }

    pub fn use_formatter(&self, formatter: Formatter) -> Result<(), LoggerError> {
        self.update(|state| state.formatter = formatter)
    }

    /// Routes output back to stdout, dropping the logger's reference to any log file.
    pub fn use_stdout(&self) -> Result<(), LoggerError> {
        self.set_output(Output::Stdout)
    }

    fn set_output(&self, output: Output) -> Result<(), LoggerError> {
        self.update(|state| state.output = output)
    }

    fn update<F>(&self, change: F) -> Result<(), LoggerError>
    where
        F: FnOnce(&mut State),
    {
        let mut state = self.state();
        let mut next = State {
            formatter: state.formatter,
            output: state.output.clone(),
        };
        change(&mut next);

        self.inner.layer.reload(next.layer())?;
        *state = next;
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current severity threshold.
    pub fn level(&self) -> Severity {
        Severity::from_u8(self.inner.threshold.load(Ordering::Relaxed))
    }

    pub fn formatter(&self) -> Formatter {
        self.state().formatter
    }

    /// Path of the log file being written, `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.state().output.path().map(|p| p.to_path_buf())
    }

    /// Emits `message` at `severity`.
    ///
    /// Fatal and panic messages are logged as errors tagged with the
    /// severity field; the logger neither exits nor panics.
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        match severity {
            Severity::Trace => trace!("{message}"),
            Severity::Debug => debug!("{message}"),
            Severity::Info => info!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
            Severity::Fatal | Severity::Panic => {
                error!(severity = severity.as_str(), "{message}")
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("formatter", &state.formatter)
            .field("output", &state.output.path())
            .finish()
    }
}
