//! End-to-end dispatch through the real HTTP providers against a mock server.

use std::sync::Arc;

use reply_core::{GenerationRequest, Language, MemoryConfigStore};
use reply_engine::{InboundMessage, ReplyError, RequestDispatcher};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(endpoint: String) -> RequestDispatcher {
    let store = MemoryConfigStore::from_json(json!({
        "apiKey": "test-key",
        "apiEndpoint": endpoint,
        "suggestionCount": 2,
        "styleExamples": {
            "categories": [
                {"id": "legacy-formal", "name": "Formal", "content": "Use honorifics.   "}
            ]
        }
    }));
    RequestDispatcher::new(Arc::new(store))
}

#[tokio::test]
async fn test_gemini_generate_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json", "maxOutputTokens": 1024}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "```json\n[\"Thank you.\", \"Noted.\"]\n```"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(format!(
        "{}/v1beta/models/gemini-2.5-flash:generateContent",
        mock_server.uri()
    ));

    let message: InboundMessage = serde_json::from_value(json!({
        "type": "SMART_REPLY_GENERATE",
        "payload": {
            "context": "Please confirm receipt.",
            "language": "en",
            "instructionPresetIds": ["legacy-formal"]
        }
    }))
    .unwrap();

    let envelope = dispatcher.respond(&message).await;
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"ok": true, "suggestions": ["Thank you.", "Noted."], "language": "en"})
    );

    let received = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = received[0].body_json().unwrap();
    let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(system.contains("exactly 2 strings"));
    assert!(system.contains("#1 Formal\nUse honorifics."));
}

#[tokio::test]
async fn test_gemini_error_status_becomes_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}
        })))
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(format!("{}/models/x:generateContent", mock_server.uri()));
    let error = dispatcher
        .generate(&GenerationRequest::new("Hi", Language::En))
        .await
        .unwrap_err();

    assert!(matches!(error, ReplyError::Transport { status: Some(400), .. }));
    assert_eq!(
        error.user_message(Language::En),
        "AI request failed (400). API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn test_malformed_candidates_are_no_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": "oops"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(format!("{}/models/x:generateContent", mock_server.uri()));
    let error = dispatcher
        .generate(&GenerationRequest::new("Hi", Language::En))
        .await
        .unwrap_err();

    assert!(matches!(error, ReplyError::NoResponse), "got {error:?}");
    assert!(!error.user_message(Language::En).contains("oops"));
}

#[tokio::test]
async fn test_openai_compatible_proofread() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"max_tokens": 2048})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "  The text is fine.  "},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(format!("{}/v1/chat/completions", mock_server.uri()));
    let revised = dispatcher
        .proofread("The text are fine.", Language::En)
        .await
        .unwrap();

    assert_eq!(revised, "The text is fine.");
}

#[tokio::test]
async fn test_prompt_preview_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dispatcher = dispatcher_for(mock_server.uri());
    let message: InboundMessage = serde_json::from_value(json!({
        "type": "SMART_REPLY_PROMPT_PREVIEW",
        "payload": {"language": "ja", "instructionPresetIds": ["legacy-formal"]}
    }))
    .unwrap();

    let envelope = dispatcher.respond(&message).await;
    assert!(envelope.ok);
    let meta = envelope.meta.unwrap();
    assert_eq!(meta.language_label, "Japanese");
    assert_eq!(meta.count, 2);
    assert_eq!(meta.instruction_presets[0].name, "Formal");
    assert!(envelope.system_prompt.unwrap().contains("Japanese email replies"));
}
