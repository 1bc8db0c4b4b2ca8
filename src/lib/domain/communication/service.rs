//! Transactional email service

use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    error_log::{ErrorCategory, ErrorLog},
    errors::MailerError,
    mailer::TemplateMailer,
    message::{PayloadVariant, SendTemplatePayload, TemplateEmail},
    recipients::validate_recipients,
    settings::{SettingsStore, API_KEY_FIELD, SETTINGS_DOCUMENT},
    template_variables::validate_template,
};

/// What to do when the provider call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Write the failure to the error log and return no response
    #[default]
    Log,

    /// Return the failure to the caller
    Raise,
}

impl From<bool> for OnError {
    fn from(raise: bool) -> Self {
        if raise {
            OnError::Raise
        } else {
            OnError::Log
        }
    }
}

/// Transactional email service
#[async_trait]
pub trait TransactionalEmailService: Clone + Send + Sync + 'static {
    /// Sends a provider-hosted template to a list of recipients.
    ///
    /// Input, validation and credential errors are always returned. Errors
    /// from the provider call are returned with [`OnError::Raise`]; with
    /// [`OnError::Log`] they are written to the error log and the call
    /// resolves to `Ok(None)`.
    ///
    /// # Arguments
    /// * `email` - The [`TemplateEmail`] to send.
    /// * `on_error` - How provider failures are handled.
    ///
    /// # Returns
    /// - [`Ok`] with the provider's response, or [`None`] if a failure was logged.
    /// - [`Err`] containing a [`MailerError`].
    async fn send_template(
        &self,
        email: TemplateEmail,
        on_error: OnError,
    ) -> Result<Option<Value>, MailerError>;
}

#[cfg(test)]
mock! {
    pub TransactionalEmailService {}

    impl Clone for TransactionalEmailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TransactionalEmailService for TransactionalEmailService {
        async fn send_template(
            &self,
            email: TemplateEmail,
            on_error: OnError,
        ) -> Result<Option<Value>, MailerError>;
    }
}

/// Transactional email service implementation
#[derive(Debug, Clone)]
pub struct TransactionalEmailServiceImpl<S, M, L>
where
    S: SettingsStore,
    M: TemplateMailer,
    L: ErrorLog,
{
    settings: Arc<S>,
    mailer: Arc<M>,
    error_log: Arc<L>,
    variant: PayloadVariant,
}

impl<S, M, L> TransactionalEmailServiceImpl<S, M, L>
where
    S: SettingsStore,
    M: TemplateMailer,
    L: ErrorLog,
{
    /// Creates a new service using the default [`PayloadVariant`].
    pub fn new(settings: Arc<S>, mailer: Arc<M>, error_log: Arc<L>) -> Self {
        Self {
            settings,
            mailer,
            error_log,
            variant: PayloadVariant::default(),
        }
    }

    /// Uses the given payload shape for every send.
    pub fn with_variant(mut self, variant: PayloadVariant) -> Self {
        self.variant = variant;
        self
    }

    fn api_key(&self) -> Result<String, MailerError> {
        self.settings
            .get_value(SETTINGS_DOCUMENT, API_KEY_FIELD)
            .filter(|key| !key.trim().is_empty())
            .ok_or(MailerError::MissingCredential)
    }

    fn prepare(&self, email: TemplateEmail) -> Result<(String, SendTemplatePayload), MailerError> {
        let recipients = email.recipients.resolve("recipients")?;
        let variables = email
            .variables
            .map(|variables| variables.resolve("variables"))
            .transpose()?
            .unwrap_or_default();

        validate_recipients(&recipients)?;
        let merge_vars = validate_template(email.template.as_deref(), variables)?;

        let api_key = self.api_key()?;

        let payload = SendTemplatePayload::build(
            self.variant,
            email.template.as_deref().unwrap_or_default(),
            recipients,
            &email.from_email,
            email.subject.as_deref(),
            merge_vars,
        );

        Ok((api_key, payload))
    }
}

#[async_trait]
impl<S, M, L> TransactionalEmailService for TransactionalEmailServiceImpl<S, M, L>
where
    S: SettingsStore,
    M: TemplateMailer,
    L: ErrorLog,
{
    async fn send_template(
        &self,
        email: TemplateEmail,
        on_error: OnError,
    ) -> Result<Option<Value>, MailerError> {
        let (api_key, payload) = self.prepare(email)?;

        debug!(
            template = %payload.template_name,
            recipients = payload.message.to.len(),
            "sending templated email"
        );

        match self.mailer.send_template(&api_key, &payload).await {
            Ok(response) => {
                info!(template = %payload.template_name, "templated email accepted");

                Ok(Some(response))
            }
            Err(err) => {
                let err = MailerError::from(err);

                match on_error {
                    OnError::Raise => Err(err),
                    OnError::Log => {
                        let category = err.category().unwrap_or(ErrorCategory::Other);

                        warn!(template = %payload.template_name, %category, "templated email failed");
                        self.error_log.log_error(&describe(&err), category);

                        Ok(None)
                    }
                }
            }
        }
    }
}

/// Joins an error and its sources into one line
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::communication::{
        errors::{ApiErrorDetails, ProviderError},
        input::Input,
        recipients::Recipient,
        template_variables::TemplateVariable,
        tests::{MockErrorLog, MockSettingsStore, MockTemplateMailer},
    };

    use super::*;

    type Service = TransactionalEmailServiceImpl<MockSettingsStore, MockTemplateMailer, MockErrorLog>;

    fn settings_with_key() -> MockSettingsStore {
        let mut settings = MockSettingsStore::new();

        settings
            .expect_get_value()
            .withf(|document, field| document == SETTINGS_DOCUMENT && field == API_KEY_FIELD)
            .returning(|_, _| Some("test-key".to_string()));

        settings
    }

    fn unused_mailer() -> MockTemplateMailer {
        let mut mailer = MockTemplateMailer::new();
        mailer.expect_send_template().times(0);
        mailer
    }

    fn unused_log() -> MockErrorLog {
        let mut log = MockErrorLog::new();
        log.expect_log_error().times(0);
        log
    }

    fn service(settings: MockSettingsStore, mailer: MockTemplateMailer, log: MockErrorLog) -> Service {
        TransactionalEmailServiceImpl::new(Arc::new(settings), Arc::new(mailer), Arc::new(log))
    }

    fn failing_mailer(error: fn() -> ProviderError) -> MockTemplateMailer {
        let mut mailer = MockTemplateMailer::new();

        mailer
            .expect_send_template()
            .times(1)
            .returning(move |_, _| Err(error()));

        mailer
    }

    fn api_error() -> ProviderError {
        ProviderError::Api(ApiErrorDetails {
            status: 500,
            code: Some(12),
            name: Some("Unknown_Template".to_string()),
            message: "No such template \"welcome\"".to_string(),
        })
    }

    fn welcome_email() -> TemplateEmail {
        TemplateEmail::new(vec![Recipient::new("x@y.com")], "no-reply@y.com", "welcome")
            .with_variables(vec![TemplateVariable::new("first_name", "Jo")])
    }

    /// Sends `email` and returns the payload handed to the provider
    async fn captured_payload(email: TemplateEmail) -> Result<SendTemplatePayload, MailerError> {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let mut mailer = MockTemplateMailer::new();

        mailer
            .expect_send_template()
            .times(1)
            .returning(move |_, payload| {
                sink.lock().unwrap().push(payload.clone());
                Ok(json!([]))
            });

        service(settings_with_key(), mailer, unused_log())
            .send_template(email, OnError::Raise)
            .await?;

        let payload = captured.lock().unwrap().pop().unwrap();

        Ok(payload)
    }

    #[tokio::test]
    async fn test_send_template_success() -> TestResult {
        let response = json!([{"email": "x@y.com", "status": "sent", "_id": "abc123"}]);
        let expected = response.clone();

        let mut mailer = MockTemplateMailer::new();

        mailer
            .expect_send_template()
            .times(1)
            .withf(|api_key, payload| {
                api_key == "test-key"
                    && payload.template_name == "welcome"
                    && payload.message.to == vec![Recipient::new("x@y.com")]
                    && payload.message.from_email == "no-reply@y.com"
                    && payload.message.subject.is_none()
            })
            .returning(move |_, _| Ok(response.clone()));

        let result = service(settings_with_key(), mailer, unused_log())
            .send_template(welcome_email(), OnError::Raise)
            .await?;

        assert_eq!(result, Some(expected));

        Ok(())
    }

    #[tokio::test]
    async fn test_default_variant_embeds_global_merge_vars() -> TestResult {
        let payload = captured_payload(welcome_email()).await?;

        assert_eq!(
            serde_json::to_value(&payload)?,
            json!({
                "template_name": "welcome",
                "template_content": [],
                "message": {
                    "to": [{"email": "x@y.com"}],
                    "from_email": "no-reply@y.com",
                    "merge_language": "handlebars",
                    "global_merge_vars": [{"name": "first_name", "content": "Jo"}]
                }
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_template_content_variant() -> TestResult {
        let mut mailer = MockTemplateMailer::new();

        mailer
            .expect_send_template()
            .times(1)
            .withf(|_, payload| {
                payload.template_content.len() == 1
                    && payload.message.global_merge_vars.is_none()
                    && payload.message.merge_language.is_none()
            })
            .returning(|_, _| Ok(json!([])));

        let service = service(settings_with_key(), mailer, unused_log())
            .with_variant(PayloadVariant::TemplateContent);

        let result = service.send_template(welcome_email(), OnError::Raise).await?;

        assert_eq!(result, Some(json!([])));

        Ok(())
    }

    #[tokio::test]
    async fn test_serialized_and_structured_recipients_produce_same_payload() -> TestResult {
        let structured = captured_payload(TemplateEmail::new(
            vec![Recipient::new("a@example.com")],
            "no-reply@example.com",
            "welcome",
        ))
        .await?;

        let serialized = captured_payload(TemplateEmail::new(
            r#"[{"email":"a@example.com"}]"#,
            "no-reply@example.com",
            "welcome",
        ))
        .await?;

        assert_eq!(structured, serialized);

        Ok(())
    }

    #[tokio::test]
    async fn test_serialized_variables_are_parsed() -> TestResult {
        let payload = captured_payload(
            TemplateEmail::new(vec![Recipient::new("x@y.com")], "no-reply@y.com", "welcome")
                .with_variables(r#"[{"name":"first_name","content":"Jo"}]"#),
        )
        .await?;

        assert_eq!(
            serde_json::to_value(&payload.message.global_merge_vars)?,
            json!([{"name": "first_name", "content": "Jo"}])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_email_fails_in_both_modes() {
        for on_error in [OnError::Log, OnError::Raise] {
            let email = TemplateEmail::new(
                r#"[{"email":"x@y.com"},{"name":"Nobody"}]"#,
                "no-reply@y.com",
                "welcome",
            );

            let result = service(settings_with_key(), unused_mailer(), unused_log())
                .send_template(email, on_error)
                .await;

            assert!(matches!(result, Err(MailerError::MissingEmail { index: 1 })));
        }
    }

    #[tokio::test]
    async fn test_empty_recipients_fail() {
        for recipients in [
            Input::<Recipient>::Structured(vec![]),
            "[]".into(),
            "null".into(),
        ] {
            let email = TemplateEmail::new(recipients, "no-reply@y.com", "welcome");

            let result = service(settings_with_key(), unused_mailer(), unused_log())
                .send_template(email, OnError::Log)
                .await;

            assert!(matches!(result, Err(MailerError::MissingRecipients)));
        }
    }

    #[tokio::test]
    async fn test_missing_template_fails() {
        let email = TemplateEmail {
            template: None,
            ..welcome_email()
        };

        let result = service(settings_with_key(), unused_mailer(), unused_log())
            .send_template(email, OnError::Log)
            .await;

        assert!(matches!(result, Err(MailerError::MissingTemplate)));
    }

    #[tokio::test]
    async fn test_invalid_template_content_fails() {
        let email = welcome_email().with_variables(r#"[{"name":"first_name"}]"#);

        let result = service(settings_with_key(), unused_mailer(), unused_log())
            .send_template(email, OnError::Log)
            .await;

        assert!(matches!(
            result,
            Err(MailerError::InvalidTemplateContent { index: 0 })
        ));
    }

    #[tokio::test]
    async fn test_malformed_recipients_fail() {
        let email = TemplateEmail::new("[{\"email\": ", "no-reply@y.com", "welcome");

        let result = service(settings_with_key(), unused_mailer(), unused_log())
            .send_template(email, OnError::Log)
            .await;

        assert!(matches!(
            result,
            Err(MailerError::MalformedInput {
                field: "recipients",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_even_when_logging() {
        let mut settings = MockSettingsStore::new();
        settings.expect_get_value().returning(|_, _| None);

        let result = service(settings, unused_mailer(), unused_log())
            .send_template(welcome_email(), OnError::Log)
            .await;

        assert!(matches!(result, Err(MailerError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_blank_credential_is_missing() {
        let mut settings = MockSettingsStore::new();
        settings
            .expect_get_value()
            .returning(|_, _| Some("   ".to_string()));

        let result = service(settings, unused_mailer(), unused_log())
            .send_template(welcome_email(), OnError::Raise)
            .await;

        assert!(matches!(result, Err(MailerError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_api_error_is_logged_when_logging() -> TestResult {
        let mut log = MockErrorLog::new();

        log.expect_log_error()
            .times(1)
            .withf(|message, category| {
                *category == ErrorCategory::ProviderApi && message.contains("Unknown_Template")
            })
            .return_const(());

        let result = service(settings_with_key(), failing_mailer(api_error), log)
            .send_template(welcome_email(), OnError::Log)
            .await?;

        assert_eq!(result, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_api_error_is_raised_when_raising() {
        let result = service(settings_with_key(), failing_mailer(api_error), unused_log())
            .send_template(welcome_email(), OnError::Raise)
            .await;

        assert!(matches!(
            result,
            Err(MailerError::ProviderApi(ApiErrorDetails { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_logged_as_other() -> TestResult {
        let mut log = MockErrorLog::new();

        log.expect_log_error()
            .times(1)
            .withf(|message, category| {
                *category == ErrorCategory::Other && message == "connection refused"
            })
            .return_const(());

        let mailer = failing_mailer(|| ProviderError::Transport(anyhow!("connection refused")));

        let result = service(settings_with_key(), mailer, log)
            .send_template(welcome_email(), false.into())
            .await?;

        assert_eq!(result, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_transport_error_is_raised_when_raising() {
        let mailer = failing_mailer(|| ProviderError::Transport(anyhow!("timed out")));

        let result = service(settings_with_key(), mailer, unused_log())
            .send_template(welcome_email(), OnError::Raise)
            .await;

        assert!(matches!(result, Err(MailerError::Transport(_))));
    }

    #[test]
    fn test_on_error_from_bool() {
        assert_eq!(OnError::from(true), OnError::Raise);
        assert_eq!(OnError::from(false), OnError::Log);
        assert_eq!(OnError::default(), OnError::Log);
    }

    #[test]
    fn test_describe_joins_sources() {
        let err = MailerError::MalformedInput {
            field: "variables",
            source: serde_json::from_str::<Value>("{").unwrap_err(),
        };

        assert!(describe(&err).starts_with("variables could not be parsed: EOF"));
    }
}
