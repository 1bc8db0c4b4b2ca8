//! Error types for the transactional email module

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::error_log::ErrorCategory;

/// Details of a failure reported by the email provider itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetails {
    /// The HTTP status code of the provider's response
    pub status: u16,

    /// The provider's numeric error code, if it sent one
    pub code: Option<i64>,

    /// The provider's error name, e.g. `Invalid_Key`
    pub name: Option<String>,

    /// The provider's error message, or the raw response body
    pub message: String,
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({}): {}", name, self.status, self.message),
            None => write!(f, "status {}: {}", self.status, self.message),
        }
    }
}

/// Errors returned by a [`TemplateMailer`](super::TemplateMailer)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a structured error
    #[error("provider API error: {0}")]
    Api(ApiErrorDetails),

    /// The request never produced a usable provider answer
    #[error(transparent)]
    Transport(anyhow::Error),
}

/// Errors that can occur when sending a templated email
#[derive(Debug, Error)]
pub enum MailerError {
    /// No recipients were given
    #[error("Recipients must be defined")]
    MissingRecipients,

    /// A recipient has no email address
    #[error("Email must be specified (recipient {index})")]
    MissingEmail {
        /// Position of the offending recipient
        index: usize,
    },

    /// The template name is empty or absent
    #[error("Template name missing")]
    MissingTemplate,

    /// A template variable lacks its name or content
    #[error("Template Content invalid. Make sure 'name' and 'content' are specified (variable {index})")]
    InvalidTemplateContent {
        /// Position of the offending variable
        index: usize,
    },

    /// The provider API key is not configured
    #[error("Mailchimp API Key not specified")]
    MissingCredential,

    /// Serialized recipients or variables could not be parsed
    #[error("{field} could not be parsed")]
    MalformedInput {
        /// Which input failed to parse
        field: &'static str,

        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The provider rejected the request
    #[error("provider API error: {0}")]
    ProviderApi(ApiErrorDetails),

    /// Any other failure while calling the provider
    #[error(transparent)]
    Transport(anyhow::Error),
}

impl MailerError {
    /// Returns `true` for failures raised by the provider call rather than by validation.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, MailerError::ProviderApi(_) | MailerError::Transport(_))
    }

    /// The error-log category for provider failures, `None` for everything else.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            MailerError::ProviderApi(_) => Some(ErrorCategory::ProviderApi),
            MailerError::Transport(_) => Some(ErrorCategory::Other),
            _ => None,
        }
    }
}

impl From<ProviderError> for MailerError {
    fn from(err: ProviderError) -> Self {
        debug!("ProviderError -> MailerError");

        match err {
            ProviderError::Api(details) => MailerError::ProviderApi(details),
            ProviderError::Transport(e) => MailerError::Transport(e),
        }
    }
}
