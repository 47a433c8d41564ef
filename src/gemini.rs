use crate::chat_models::{
    GeminiContent, GeminiSystemInstruction, GenerateContentRequest, GenerateContentResponse,
};
use crate::errors::AppError;
use reqwest::StatusCode;
use std::time::Duration;

/// Upper bound on a single model attempt. The failover chain moves on to the
/// next identifier (or the local responder) instead of waiting on a stalled
/// provider.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

/// Client for the Gemini `generateContent` API.
///
/// The base URL is injected so tests can point the client at a mock server.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new `GeminiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and host of the provider (no trailing slash).
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Gemini client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Issues one `generateContent` call against a single model identifier.
    ///
    /// Error classification drives the failover loop:
    /// * HTTP 404 becomes `AppError::NotFound` — the identifier was renamed or
    ///   retired, worth one retry against the model's known alias.
    /// * Any other non-2xx, a transport failure, or a 2xx without extractable
    ///   candidate text becomes `AppError::ExternalApiError` — move on to the
    ///   next identifier.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The first candidate's text.
    pub async fn generate(
        &self,
        model: &str,
        api_key: &str,
        contents: &[GeminiContent],
        system_instruction: &str,
    ) -> Result<String, AppError> {
        // Build URL with proper parameter encoding; the key travels as a
        // query parameter per the provider's v1beta convention.
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1beta/models/{}:generateContent", self.base_url, model),
            &[("key", api_key)],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build Gemini URL: {}", e)))?;

        // Redact the key from logs to prevent credential exposure.
        tracing::debug!(
            "Calling {}/v1beta/models/{}:generateContent?key=[REDACTED]",
            self.base_url,
            model
        );

        let body = GenerateContentRequest {
            contents,
            system_instruction: GeminiSystemInstruction::from_text(system_instruction),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::NotFound(format!(
                "Model {} not found: {}",
                model, error_text
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Gemini model {} returned {}: {}",
                model, status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Gemini response: {}", e))
        })?;

        parsed.first_text().ok_or_else(|| {
            AppError::ExternalApiError(format!(
                "Gemini model {} returned no candidates with text",
                model
            ))
        })
    }
}
