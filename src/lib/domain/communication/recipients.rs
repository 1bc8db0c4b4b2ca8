//! Email recipients

use serde::{Deserialize, Serialize};

use super::errors::MailerError;

/// How a recipient receives the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    /// Primary recipient
    To,

    /// Carbon copy
    Cc,

    /// Blind carbon copy
    Bcc,
}

/// A single recipient of a templated email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// The recipient's email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The recipient's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The header the recipient is placed in
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RecipientKind>,
}

impl Recipient {
    /// Creates a recipient with just an email address
    pub fn new(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    /// Sets the recipient's display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets the header the recipient is placed in
    pub fn with_kind(mut self, kind: RecipientKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn has_email(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| !email.trim().is_empty())
    }
}

/// Checks that there is at least one recipient and that each has an email address.
pub fn validate_recipients(recipients: &[Recipient]) -> Result<(), MailerError> {
    if recipients.is_empty() {
        return Err(MailerError::MissingRecipients);
    }

    match recipients.iter().position(|r| !r.has_email()) {
        Some(index) => Err(MailerError::MissingEmail { index }),
        None => Ok(()),
    }
}
