//! Layer enforcing the runtime severity threshold.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::severity::{SEVERITY_FIELD, Severity};

/// Filters events below the threshold shared with the [`Logger`](super::Logger).
///
/// Callsites always get `Interest::sometimes` because the threshold can
/// change after they are registered.
#[derive(Debug, Clone)]
pub(crate) struct SeverityGate {
    threshold: Arc<AtomicU8>,
}

impl SeverityGate {
    pub(crate) fn new(threshold: Arc<AtomicU8>) -> Self {
        Self { threshold }
    }

    fn threshold(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    fn level_passes(&self, level: Level) -> bool {
        let threshold = self.threshold();
        // fatal and panic ride on ERROR; decided per event
        Severity::from(level) >= threshold || (level == Level::ERROR && threshold > Severity::Error)
    }
}

impl<S: Subscriber> Layer<S> for SeverityGate {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.level_passes(*metadata.level())
    }

    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        event_severity(event) >= self.threshold()
    }
}

/// Severity of an event, honoring the severity field on `ERROR` events.
pub(crate) fn event_severity(event: &Event<'_>) -> Severity {
    let level = *event.metadata().level();
    if level != Level::ERROR {
        return Severity::from(level);
    }

    let mut visitor = SeverityVisitor::default();
    event.record(&mut visitor);
    match visitor.0 {
        Some(severity) if severity > Severity::Error => severity,
        _ => Severity::Error,
    }
}

#[derive(Default)]
struct SeverityVisitor(Option<Severity>);

impl Visit for SeverityVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == SEVERITY_FIELD {
            self.0 = value.parse().ok();
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}
