//! Error log backed by `tracing`

use tracing::error;

use crate::domain::communication::{ErrorCategory, ErrorLog};

/// Writes logged failures as `tracing` error events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    #[mutants::skip]
    fn log_error(&self, message: &str, category: ErrorCategory) {
        error!(title = category.title(), "{}", message);
    }
}
