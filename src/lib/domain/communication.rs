//! Transactional email: validation, payload construction and delivery policy.

mod error_log;
mod errors;
mod input;
mod mailer;
mod message;
mod recipients;
mod records;
mod service;
mod settings;
mod template_variables;

pub use error_log::{ErrorCategory, ErrorLog};
pub use errors::{ApiErrorDetails, MailerError, ProviderError};
pub use input::Input;
pub use mailer::TemplateMailer;
pub use message::{
    MergeLanguage, PayloadMessage, PayloadVariant, SendTemplatePayload, TemplateEmail,
};
pub use recipients::{validate_recipients, Recipient, RecipientKind};
pub use records::{
    scrub, variables_from_record, Document, FieldValue, Record, RECORD_NAME_FIELD,
    RECORD_TYPE_FIELD,
};
pub use service::{OnError, TransactionalEmailService, TransactionalEmailServiceImpl};
pub use settings::{SettingsStore, API_KEY_FIELD, SETTINGS_DOCUMENT};
pub use template_variables::{validate_template, MergeVar, TemplateVariable};
