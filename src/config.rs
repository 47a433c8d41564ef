use crate::failover::{default_model_chain, parse_model_chain, ModelRoute};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub csv_path: String,
    /// Gemini credential. `None` is a supported configuration and puts the
    /// chat endpoint in permanent local-fallback mode.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Ordered failover chain, operator-overridable via `GEMINI_MODELS`.
    pub model_chain: Vec<ModelRoute>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            csv_path: std::env::var("INSTITUTIONS_CSV")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "institutions.csv".to_string()),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("GEMINI_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            model_chain: std::env::var("GEMINI_MODELS")
                .ok()
                .map(|raw| parse_model_chain(&raw))
                .filter(|chain| !chain.is_empty())
                .unwrap_or_else(default_model_chain),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!("Institutions CSV: {}", config.csv_path);
        tracing::debug!("Gemini Base URL: {}", config.gemini_base_url);
        tracing::debug!(
            "Gemini models: {:?}",
            config
                .model_chain
                .iter()
                .map(|route| route.primary.as_str())
                .collect::<Vec<_>>()
        );
        if config.gemini_api_key.is_some() {
            tracing::info!("Gemini API key configured");
        } else {
            tracing::warn!("No Gemini API key configured; chat will run in local fallback mode");
        }

        Ok(config)
    }
}
