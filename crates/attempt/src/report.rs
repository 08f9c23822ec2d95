//! Side-effect reporting of caught failures.

use crate::caught::Caught;
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Caller-supplied reporter, invoked after the logger.
pub type Reporter = Arc<dyn Fn(&Caught) + Send + Sync>;

/// A logger with an `error` operation.
///
/// Closures can be used through [`log_fn`] or
/// [`AttemptBuilder::log_with`](crate::AttemptBuilder::log_with).
pub trait ErrorLogger: Send + Sync {
    /// Record a caught failure.
    fn error(&self, caught: &Caught);
}

/// A logger backed by a closure. Built with [`log_fn`].
#[derive(Clone)]
pub struct LogFn<F> {
    f: F,
}

/// Use a plain function as an [`ErrorLogger`].
pub fn log_fn<F>(f: F) -> LogFn<F>
where
    F: Fn(&Caught) + Send + Sync,
{
    LogFn { f }
}

impl<F> ErrorLogger for LogFn<F>
where
    F: Fn(&Caught) + Send + Sync,
{
    fn error(&self, caught: &Caught) {
        (self.f)(caught)
    }
}

impl<F> fmt::Debug for LogFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFn").finish_non_exhaustive()
    }
}

/// Logs caught failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn error(&self, caught: &Caught) {
        error!(
            kind = caught.type_name(),
            panic = caught.is_panic(),
            error = %caught,
            "operation failed"
        );
    }
}

/// Logger then reporter, fixed at construction.
#[derive(Clone, Default)]
pub(crate) struct Reporting {
    logger: Option<Arc<dyn ErrorLogger>>,
    reporter: Option<Reporter>,
}

impl Reporting {
    pub(crate) fn new(logger: Option<Arc<dyn ErrorLogger>>, reporter: Option<Reporter>) -> Self {
        Self { logger, reporter }
    }

    /// Logger first, then reporter. Panics in either are not contained.
    pub(crate) fn report(&self, caught: &Caught) {
        if let Some(logger) = &self.logger {
            logger.error(caught);
        }
        if let Some(reporter) = &self.reporter {
            reporter(caught);
        }
    }
}

impl fmt::Debug for Reporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporting")
            .field("logger", &self.logger.is_some())
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl ErrorLogger for Recorder {
        fn error(&self, caught: &Caught) {
            self.lines.lock().unwrap().push(format!("logger: {}", caught));
        }
    }

    #[test]
    fn test_logger_runs_before_reporter() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let reporter_lines = Arc::clone(&lines);
        let reporting = Reporting::new(
            Some(Arc::new(Recorder {
                lines: Arc::clone(&lines),
            })),
            Some(Arc::new(move |caught: &Caught| {
                reporter_lines
                    .lock()
                    .unwrap()
                    .push(format!("reporter: {}", caught));
            })),
        );

        reporting.report(&Caught::from_error("disk full"));

        assert_eq!(
            *lines.lock().unwrap(),
            vec!["logger: disk full".to_string(), "reporter: disk full".to_string()]
        );
    }

    #[test]
    fn test_function_logger() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let logger = log_fn(move |caught: &Caught| {
            *seen_clone.lock().unwrap() = Some(caught.message());
        });

        logger.error(&Caught::from_error("timeout"));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("timeout"));
    }

    #[test]
    fn test_empty_reporting_is_noop() {
        Reporting::default().report(&Caught::from_error("ignored"));
    }

    #[test]
    fn test_tracing_logger_emits_without_subscriber() {
        TracingLogger.error(&Caught::from_panic(Box::new("boom")));
    }
}
