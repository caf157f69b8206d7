//! `NarrativeGenerator` implementation over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use questline_narrative::domain::generator::{
    GenerationRequest, GeneratorError, NarrativeGenerator, TurnResult,
};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::wire::{PREVIOUS_RESPONSE_NOT_FOUND, ResponsesRequest, ResponsesResponse, parse_api_error};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Value of the `api-key` header.
    pub api_key: String,
    /// Deployment name, sent as the model.
    pub deployment: String,
    /// Optional `api-version` query parameter.
    pub api_version: Option<String>,
    /// Whether to keep context server-side and hand back continuation tokens.
    pub use_continuation: bool,
    /// Upper bound on a single HTTP exchange.
    pub request_timeout: Duration,
}

impl AzureOpenAiConfig {
    /// Settings with continuation enabled and the default request timeout.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: None,
            use_continuation: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Narrative generator that calls an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiGenerator {
    client: reqwest::Client,
    config: AzureOpenAiConfig,
    url: String,
}

impl AzureOpenAiGenerator {
    /// Builds the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Unavailable` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GeneratorError::Unavailable(format!("http client: {e}")))?;
        let url = format!(
            "{}/openai/v1/responses",
            config.endpoint.trim_end_matches('/')
        );
        Ok(Self {
            client,
            config,
            url,
        })
    }

    fn transport_error(err: &reqwest::Error) -> GeneratorError {
        if err.is_timeout() {
            GeneratorError::Timeout
        } else {
            GeneratorError::Unavailable(err.to_string())
        }
    }

    fn status_error(status: StatusCode, body: &str) -> GeneratorError {
        let (message, code) = parse_api_error(body, status.as_u16());
        if code.as_deref() == Some(PREVIOUS_RESPONSE_NOT_FOUND) {
            return GeneratorError::ContinuationExpired;
        }
        GeneratorError::Unavailable(format!("status {}: {message}", status.as_u16()))
    }
}

#[async_trait]
impl NarrativeGenerator for AzureOpenAiGenerator {
    #[instrument(skip_all, fields(theme = %request.theme, continuation = request.continuation_token().is_some()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<TurnResult, GeneratorError> {
        let body = ResponsesRequest::from_generation(
            &self.config.deployment,
            request,
            self.config.use_continuation,
        );

        let mut call = self
            .client
            .post(&self.url)
            .header("api-key", &self.config.api_key)
            .json(&body);
        if let Some(version) = &self.config.api_version {
            call = call.query(&[("api-version", version)]);
        }

        let response = call.send().await.map_err(|e| Self::transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = Self::status_error(status, &text);
            warn!(status = status.as_u16(), error = %err, "generator request rejected");
            return Err(err);
        }

        let payload: ResponsesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else {
                GeneratorError::Malformed(format!("invalid response body: {e}"))
            }
        })?;

        let mut result = TurnResult::from_json(&payload.output_text())?;
        result.continuation_token = self.config.use_continuation.then_some(payload.id);
        debug!(choices = result.choices.len(), "turn generated");
        Ok(result)
    }
}
