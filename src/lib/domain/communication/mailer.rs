//! Email provider port

use async_trait::async_trait;
use serde_json::Value;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{errors::ProviderError, message::SendTemplatePayload};

/// An email provider able to send provider-hosted templates
#[async_trait]
pub trait TemplateMailer: Clone + Send + Sync + 'static {
    /// Send a templated email
    ///
    /// # Arguments
    /// * `api_key` - The provider API key.
    /// * `payload` - The [`SendTemplatePayload`] to send.
    ///
    /// # Returns
    /// The provider's response body, untouched, or a [`ProviderError`].
    async fn send_template(
        &self,
        api_key: &str,
        payload: &SendTemplatePayload,
    ) -> Result<Value, ProviderError>;
}

#[cfg(test)]
mock! {
    pub TemplateMailer {}

    impl Clone for TemplateMailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TemplateMailer for TemplateMailer {
        async fn send_template(&self, api_key: &str, payload: &SendTemplatePayload) -> Result<Value, ProviderError>;
    }
}
