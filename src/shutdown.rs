//! Interrupt handling.
//!
//! Instead of exiting from inside the logger, the handler releases the log
//! file and fires a [`Shutdown`] event. Whoever owns the process (normally
//! `main`) waits on it and exits.

use std::fmt;
use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

use crate::logger::{LogFile, Logger, LoggerError};

/// Signal that started the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Shutdown event, fired once after the log file has been closed.
///
/// Clones observe the same event.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the event fires.
    ///
    /// Also returns if the handler task is gone without firing, since
    /// nothing can fire the event after that.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}

/// Registers SIGINT and SIGTERM listeners and spawns the close handler.
///
/// Listeners are registered before this returns, so a signal arriving
/// before the handler task first runs is still seen. Must be called from
/// within a tokio runtime.
pub fn install_interrupt_handler(
    logger: Logger,
    file: Option<LogFile>,
) -> Result<Shutdown, LoggerError> {
    let signal = listen()?;
    Ok(spawn_close_handler(logger, file, signal))
}

/// Spawns a one-shot task that runs the close sequence when `trigger` resolves.
///
/// The sequence: log the signal at debug level, route the logger back to
/// stdout, sync and close `file`, fire the event. Close errors are ignored.
pub fn spawn_close_handler<F>(logger: Logger, file: Option<LogFile>, trigger: F) -> Shutdown
where
    F: Future<Output = ShutdownSignal> + Send + 'static,
{
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        let signal = trigger.await;
        debug!(signal = %signal, "interrupt received, terminating");

        if let Some(file) = file {
            if let Err(e) = logger.use_stdout() {
                debug!(error = %e, "failed to detach log file");
            }
            let _ = file.close();
        }

        let _ = tx.send(true);
    });

    Shutdown { rx }
}

#[cfg(unix)]
fn listen() -> Result<impl Future<Output = ShutdownSignal> + Send + 'static, LoggerError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).map_err(LoggerError::Signal)?;
    let mut terminate = signal(SignalKind::terminate()).map_err(LoggerError::Signal)?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => ShutdownSignal::Interrupt,
            _ = terminate.recv() => ShutdownSignal::Terminate,
        }
    })
}

#[cfg(not(unix))]
fn listen() -> Result<impl Future<Output = ShutdownSignal> + Send + 'static, LoggerError> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            debug!(error = %e, "ctrl-c listener failed");
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use serde_json::Value;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_handler_logs_closes_file_and_fires() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let (logger, subscriber) = Logger::new();
        let _guard = tracing::subscriber::set_default(subscriber);

        let file = logger
            .configure(&LogConfig::new(path.to_str().unwrap(), "json", "debug"))
            .unwrap();
        assert!(file.is_some());

        let (tx, rx) = oneshot::channel::<()>();
        let mut shutdown = spawn_close_handler(logger.clone(), file, async move {
            let _ = rx.await;
            ShutdownSignal::Terminate
        });
        assert!(!shutdown.is_triggered());

        tx.send(()).unwrap();
        shutdown.wait().await;

        assert!(shutdown.is_triggered());
        assert_eq!(logger.output_path(), None);

        let content = std::fs::read_to_string(&path).unwrap();
        let last: Value = serde_json::from_str(content.lines().last().unwrap()).unwrap();
        assert_eq!(last["level"], "DEBUG");
        assert_eq!(last["fields"]["signal"], "SIGTERM");
        assert_eq!(last["fields"]["message"], "interrupt received, terminating");
    }

    #[tokio::test]
    async fn test_clones_observe_shutdown_without_file() {
        let (logger, _subscriber) = Logger::new();

        let (tx, rx) = oneshot::channel::<()>();
        let mut shutdown = spawn_close_handler(logger, None, async move {
            let _ = rx.await;
            ShutdownSignal::Interrupt
        });
        let mut observer = shutdown.clone();

        tx.send(()).unwrap();
        shutdown.wait().await;
        observer.wait().await;

        assert!(observer.is_triggered());
    }

    #[tokio::test]
    async fn test_install_registers_listeners() {
        let (logger, _subscriber) = Logger::new();

        let shutdown = install_interrupt_handler(logger, None).unwrap();

        assert!(!shutdown.is_triggered());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.to_string(), "SIGTERM");
    }
}
