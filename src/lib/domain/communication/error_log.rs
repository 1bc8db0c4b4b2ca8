//! Error log port

use std::fmt;

#[cfg(test)]
use mockall::mock;

/// Category of a logged send failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The provider reported an error
    ProviderApi,

    /// Anything else went wrong during the provider call
    Other,
}

impl ErrorCategory {
    /// The title the error is logged under
    pub fn title(&self) -> &'static str {
        match self {
            Self::ProviderApi => "Mailchimp: API Error",
            Self::Other => "Mailchimp: Error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Sink for failures that are not returned to the caller
pub trait ErrorLog: Clone + Send + Sync + 'static {
    /// Record a failure
    fn log_error(&self, message: &str, category: ErrorCategory);
}

#[cfg(test)]
mock! {
    pub ErrorLog {}

    impl Clone for ErrorLog {
        fn clone(&self) -> Self;
    }

    impl ErrorLog for ErrorLog {
        fn log_error(&self, message: &str, category: ErrorCategory);
    }
}
