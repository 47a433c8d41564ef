/// End-to-end tests of the chat gateway's degradation behavior: remote
/// success passes through, total remote failure and missing credentials both
/// resolve to the local responder
use ched_chat_api::chat::ChatService;
use ched_chat_api::chat_models::{ChatRequest, ChatTurn};
use ched_chat_api::config::Config;
use ched_chat_api::errors::AppError;
use ched_chat_api::failover::ModelRoute;
use ched_chat_api::fallback::local_reply;
use ched_chat_api::models::Institution;
use ched_chat_api::store::InstitutionStore;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test config
fn create_test_config(gemini_base_url: String, api_key: Option<&str>) -> Config {
    Config {
        port: 3000,
        csv_path: "unused.csv".to_string(),
        gemini_api_key: api_key.map(str::to_string),
        gemini_base_url,
        model_chain: vec![
            ModelRoute::new("model-a", None),
            ModelRoute::new("model-b", None),
            ModelRoute::new("model-c", None),
        ],
    }
}

fn ready_store() -> Arc<InstitutionStore> {
    let store = InstitutionStore::new();
    store
        .publish(vec![Institution {
            name: "State University".to_string(),
            institution_type: Some("Public".to_string()),
            city: Some("Metro City".to_string()),
            province: Some("Metro Province".to_string()),
            region: Some("Capital Region".to_string()),
            website: None,
            contact: None,
        }])
        .unwrap();
    Arc::new(store)
}

fn request(text: &str) -> ChatRequest {
    ChatRequest {
        chat_history: vec![ChatTurn::new("user", text)],
        system_context: Some("You are a helpful assistant.".to_string()),
    }
}

#[tokio::test]
async fn test_no_credential_never_contacts_the_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = ready_store();
    let config = create_test_config(mock_server.uri(), None);
    let service = ChatService::from_config(&config, store.clone()).unwrap();

    let req = request("hi");
    let text = service.answer(&req).await.unwrap();
    assert_eq!(text, local_reply(&req.chat_history, &store));
}

#[tokio::test]
async fn test_remote_success_passes_text_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/model-a:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "State University is in Metro City." } ] } }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri(), Some("test_key"));
    let service = ChatService::from_config(&config, ready_store()).unwrap();

    let text = service
        .answer(&request("tell me about State University"))
        .await
        .unwrap();
    assert_eq!(text, "State University is in Metro City.");
}

#[tokio::test]
async fn test_total_remote_failure_equals_local_responder_output() {
    let mock_server = MockServer::start().await;

    // Every model in the chain fails; the gateway must answer exactly what
    // the local responder would produce standalone.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let store = ready_store();
    let config = create_test_config(mock_server.uri(), Some("test_key"));
    let service = ChatService::from_config(&config, store.clone()).unwrap();

    let req = request("anything in metro city?");
    let text = service.answer(&req).await.unwrap();
    assert_eq!(text, local_reply(&req.chat_history, &store));
    assert!(text.contains("State University"));
}

#[tokio::test]
async fn test_empty_conversation_is_the_only_caller_error() {
    let config = create_test_config("https://example.invalid".to_string(), None);
    let service = ChatService::from_config(&config, ready_store()).unwrap();

    let req = ChatRequest {
        chat_history: vec![],
        system_context: None,
    };
    let err = service.answer(&req).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_degraded_store_still_answers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .mount(&mock_server)
        .await;

    // Ingestion never completed; the responder still produces text.
    let store = Arc::new(InstitutionStore::new());
    let config = create_test_config(mock_server.uri(), Some("test_key"));
    let service = ChatService::from_config(&config, store).unwrap();

    let text = service.answer(&request("hello")).await.unwrap();
    assert!(!text.is_empty());
}
