use crate::chat_models::{to_gemini_contents, ChatRequest};
use crate::config::Config;
use crate::errors::AppError;
use crate::failover::ModelFailover;
use crate::fallback::local_reply;
use crate::gemini::GeminiClient;
use crate::guardrail::compose_system_instruction;
use crate::store::InstitutionStore;
use std::sync::Arc;

/// The chat gateway: validates the conversation, routes it through the model
/// failover chain when a credential exists, and degrades to the local
/// responder on exhaustion.
///
/// Past input validation every request resolves to non-empty text; remote
/// provider failures are logged server-side and never reach the caller.
pub struct ChatService {
    store: Arc<InstitutionStore>,
    failover: Option<ModelFailover>,
}

impl ChatService {
    /// Builds the service from config. A missing credential is a supported
    /// configuration: the failover chain is simply never constructed and the
    /// process answers in local mode for its whole lifetime.
    pub fn from_config(config: &Config, store: Arc<InstitutionStore>) -> Result<Self, AppError> {
        let failover = match &config.gemini_api_key {
            Some(api_key) => {
                let client = GeminiClient::new(config.gemini_base_url.clone())?;
                Some(ModelFailover::new(
                    client,
                    api_key.clone(),
                    config.model_chain.clone(),
                ))
            }
            None => None,
        };

        Ok(Self { store, failover })
    }

    /// Answers one chat request.
    ///
    /// The only error a caller can see is `BadRequest` for an empty
    /// conversation. Everything downstream degrades: no credential or total
    /// remote exhaustion both fall through to the deterministic local
    /// responder.
    pub async fn answer(&self, request: &ChatRequest) -> Result<String, AppError> {
        if request.chat_history.is_empty() {
            return Err(AppError::BadRequest(
                "chatHistory must contain at least one turn".to_string(),
            ));
        }

        let Some(failover) = &self.failover else {
            tracing::info!("No Gemini credential configured, answering in local mode");
            return Ok(local_reply(&request.chat_history, &self.store));
        };

        let instruction =
            compose_system_instruction(request.system_context.as_deref().unwrap_or(""));
        let contents = to_gemini_contents(&request.chat_history);

        match failover.generate(&contents, &instruction).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::error!(
                    "All Gemini models failed, degrading to local responder: {}",
                    e
                );
                Ok(local_reply(&request.chat_history, &self.store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_models::ChatTurn;
    use crate::failover::default_model_chain;
    use crate::models::Institution;

    fn local_mode_service(store: Arc<InstitutionStore>) -> ChatService {
        let config = Config {
            port: 3000,
            csv_path: "unused.csv".to_string(),
            gemini_api_key: None,
            gemini_base_url: "https://example.invalid".to_string(),
            model_chain: default_model_chain(),
        };
        ChatService::from_config(&config, store).unwrap()
    }

    fn ready_store() -> Arc<InstitutionStore> {
        let store = InstitutionStore::new();
        store
            .publish(vec![Institution {
                name: "State University".to_string(),
                institution_type: Some("Public".to_string()),
                city: Some("Metro City".to_string()),
                province: None,
                region: None,
                website: None,
                contact: None,
            }])
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_empty_conversation_is_rejected() {
        let service = local_mode_service(ready_store());
        let request = ChatRequest {
            chat_history: vec![],
            system_context: None,
        };
        let err = service.answer(&request).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_no_credential_answers_locally() {
        let store = ready_store();
        let service = local_mode_service(store.clone());
        let request = ChatRequest {
            chat_history: vec![ChatTurn::new("user", "tell me about metro city")],
            system_context: Some("You are helpful.".to_string()),
        };

        let text = service.answer(&request).await.unwrap();
        assert_eq!(text, local_reply(&request.chat_history, &store));
        assert!(text.contains("State University"));
    }
}
