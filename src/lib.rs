//! Application logger setup.
//!
//! Reads destination, formatter and level from the config file, applies them
//! to an explicit [`Logger`] handle and installs an interrupt handler that
//! closes the log file before the process exits.

pub mod config;
pub mod logger;
pub mod shutdown;

pub use config::{Config, ConfigError, LogConfig};
pub use logger::{Destination, Formatter, LogFile, Logger, LoggerError, Severity};
pub use shutdown::{Shutdown, ShutdownSignal, install_interrupt_handler};
