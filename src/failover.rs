use crate::chat_models::GeminiContent;
use crate::errors::AppError;
use crate::gemini::GeminiClient;

// ============ Model Chain ============

/// One entry in the failover chain: a primary model identifier plus an
/// optional alias to retry when the provider reports the primary as unknown.
///
/// Providers rename models over time (`gemini-1.5-flash` vs
/// `gemini-1.5-flash-latest`), so a 404 on the primary is retried once
/// against the alias before the chain moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRoute {
    pub primary: String,
    pub alias: Option<String>,
}

impl ModelRoute {
    pub fn new(primary: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            primary: primary.into(),
            alias: alias.map(|s| s.to_string()),
        }
    }
}

/// The built-in chain, ordered by preference: fast first, then stronger
/// but slower, then the legacy identifier kept for older API surfaces.
pub fn default_model_chain() -> Vec<ModelRoute> {
    vec![
        ModelRoute::new("gemini-1.5-flash", Some("gemini-1.5-flash-latest")),
        ModelRoute::new("gemini-1.5-pro", Some("gemini-1.5-pro-latest")),
        ModelRoute::new("gemini-pro", Some("gemini-1.0-pro")),
    ]
}

/// Parses a `GEMINI_MODELS` override: comma-separated `primary[:alias]`
/// entries. Blank entries are skipped; an all-blank string yields an empty
/// vec and the caller falls back to the default chain.
pub fn parse_model_chain(raw: &str) -> Vec<ModelRoute> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.split_once(':') {
                Some((primary, alias)) => {
                    let primary = primary.trim();
                    let alias = alias.trim();
                    if primary.is_empty() {
                        return None;
                    }
                    Some(ModelRoute {
                        primary: primary.to_string(),
                        alias: (!alias.is_empty()).then(|| alias.to_string()),
                    })
                }
                None => Some(ModelRoute {
                    primary: entry.to_string(),
                    alias: None,
                }),
            }
        })
        .collect()
}

// ============ Failover Orchestrator ============

/// Walks the model chain strictly in order and returns the first successful
/// generation. Each attempt is an isolated request with its own timeout, so
/// one stalled model cannot sink the whole chain.
pub struct ModelFailover {
    client: GeminiClient,
    api_key: String,
    chain: Vec<ModelRoute>,
}

impl ModelFailover {
    pub fn new(client: GeminiClient, api_key: String, chain: Vec<ModelRoute>) -> Self {
        Self {
            client,
            api_key,
            chain,
        }
    }

    /// Attempts each model in order, short-circuiting on the first success.
    ///
    /// A 404 on a primary identifier triggers one retry against its alias
    /// before the chain advances. Every other failure (HTTP error, transport
    /// error, empty candidates) advances the chain directly. When all
    /// attempts fail the error from the final attempt is returned so the
    /// caller can log what the last resort saw.
    pub async fn generate(
        &self,
        contents: &[GeminiContent],
        system_instruction: &str,
    ) -> Result<String, AppError> {
        let mut last_error =
            AppError::ExternalApiError("No Gemini models configured".to_string());

        for route in &self.chain {
            tracing::info!("Attempting Gemini model {}", route.primary);
            match self
                .client
                .generate(&route.primary, &self.api_key, contents, system_instruction)
                .await
            {
                Ok(text) => return Ok(text),
                Err(AppError::NotFound(msg)) => {
                    last_error = AppError::NotFound(msg);
                    if let Some(alias) = &route.alias {
                        tracing::warn!(
                            "Model {} not found, retrying alias {}",
                            route.primary,
                            alias
                        );
                        match self
                            .client
                            .generate(alias, &self.api_key, contents, system_instruction)
                            .await
                        {
                            Ok(text) => return Ok(text),
                            Err(e) => {
                                tracing::warn!("Alias {} failed: {}", alias, e);
                                last_error = e;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Model {} failed: {}", route.primary, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
