//! Settings backed by command-line arguments and environment variables

use clap::Parser;

use crate::domain::communication::{SettingsStore, API_KEY_FIELD, SETTINGS_DOCUMENT};

/// Mailchimp settings
#[derive(Clone, Default, PartialEq, Eq, Parser)]
pub struct MailchimpSettings {
    /// The Mailchimp Transactional (Mandrill) API key
    #[clap(long, env = "MAILCHIMP_TRANSACTIONAL_API_KEY")]
    pub transactional_email_api_key: Option<String>,
}

impl MailchimpSettings {
    /// Creates settings holding the given API key
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            transactional_email_api_key: Some(api_key.to_string()),
        }
    }
}

impl std::fmt::Debug for MailchimpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailchimpSettings")
            .field(
                "transactional_email_api_key",
                &self.transactional_email_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl SettingsStore for MailchimpSettings {
    fn get_value(&self, document: &str, field: &str) -> Option<String> {
        match (document, field) {
            (SETTINGS_DOCUMENT, API_KEY_FIELD) => self.transactional_email_api_key.clone(),
            _ => None,
        }
    }
}
