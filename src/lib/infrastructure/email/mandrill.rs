//! Mailchimp Transactional (Mandrill) email provider

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::communication::{
    ApiErrorDetails, ProviderError, SendTemplatePayload, TemplateMailer,
};

/// The public Mandrill API endpoint
pub const DEFAULT_BASE_URL: &str = "https://mandrillapp.com/api/1.0";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Mandrill configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct MandrillConfig {
    /// The API base URL
    #[clap(long = "mandrill-base-url", env = "MANDRILL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[clap(long = "mandrill-timeout", env = "MANDRILL_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl Default for MandrillConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Request body: the payload with the API key alongside it
#[derive(Serialize)]
struct AuthenticatedRequest<'a> {
    key: &'a str,

    #[serde(flatten)]
    payload: &'a SendTemplatePayload,
}

/// Error body returned by Mandrill, e.g.
/// `{"status":"error","code":-1,"name":"Invalid_Key","message":"Invalid API key"}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    name: Option<String>,
    message: Option<String>,
}

/// Mandrill API client
#[derive(Debug, Clone)]
pub struct MandrillClient {
    config: MandrillConfig,
    client: Client,
}

impl MandrillClient {
    /// Create a new Mandrill client
    pub fn new(config: MandrillConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build the Mandrill HTTP client")?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl TemplateMailer for MandrillClient {
    async fn send_template(
        &self,
        api_key: &str,
        payload: &SendTemplatePayload,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint("messages/send-template");

        debug!(%url, template = %payload.template_name, "calling Mandrill");

        let response = self
            .client
            .post(&url)
            .json(&AuthenticatedRequest {
                key: api_key,
                payload,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Mandrill returned an error");

            return Err(ProviderError::Api(api_error(status, &body)));
        }

        response.json::<Value>().await.map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.into())
}

fn api_error(status: StatusCode, body: &str) -> ApiErrorDetails {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            code,
            name,
            message: Some(message),
        }) => ApiErrorDetails {
            status: status.as_u16(),
            code,
            name,
            message,
        },
        _ => ApiErrorDetails {
            status: status.as_u16(),
            code: None,
            name: None,
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body.to_string()
            },
        },
    }
}
