// Tracing log adapter - Structured logging using tracing crate

use tracing::{debug, error, info, warn};

use crate::ports::*;

/// Log adapter forwarding to the global tracing subscriber
#[derive(Debug, Default, Clone)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create new tracing log adapter.
    ///
    /// The subscriber itself is installed once by `utils::logging`.
    pub fn new() -> Self {
        Self
    }
}

impl LogPort for TracingLogAdapter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}
