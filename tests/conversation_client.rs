//! End-to-end checks of the conversation client contract: request shape,
//! session state, and the ConfigBot list convention.

use bot_gallery::gallery::{parse_bot_line, parse_bot_list};
use bot_gallery::pullstring::{
    Bot, ConversationApi, ConversationClient, ConversationError, StartRequest, TurnRequest,
    TurnResponse,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn client() -> ConversationClient {
    ConversationClient::new(Duration::from_secs(5))
}

fn body_json(request: &reqwest::Request) -> Value {
    request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .and_then(|bytes| serde_json::from_slice(bytes).ok())
        .unwrap_or(Value::Null)
}

fn body_keys(request: &reqwest::Request) -> Vec<String> {
    let mut keys: Vec<String> = body_json(request)
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

#[test]
fn start_posts_to_the_conversation_endpoint() -> Result<(), ConversationError> {
    let request = client().build_request(
        "key-1",
        "conversation",
        &StartRequest::new("proj-123".to_string()),
    )?;

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(
        request.url().as_str(),
        "https://conversation.pullstring.ai/v1/conversation"
    );
    assert_eq!(body_keys(&request), vec!["project"]);
    Ok(())
}

#[test]
fn turns_post_to_the_uuid_endpoint() -> Result<(), ConversationError> {
    let request = client().build_request(
        "key-1",
        "conversation/abc",
        &TurnRequest::say(Some("hello".to_string())),
    )?;

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(
        request.url().as_str(),
        "https://conversation.pullstring.ai/v1/conversation/abc"
    );
    assert_eq!(body_keys(&request), vec!["text"]);
    assert_eq!(body_json(&request)["text"], "hello");
    Ok(())
}

#[test]
fn every_operation_kind_carries_the_fixed_headers() -> Result<(), ConversationError> {
    let client = client();
    let requests = vec![
        client.build_request(
            "key-1",
            "conversation",
            &StartRequest::new("proj-123".to_string()),
        )?,
        client.build_request(
            "key-1",
            "conversation/abc",
            &TurnRequest::say(Some("hi".to_string())),
        )?,
        client.build_request(
            "key-1",
            "conversation/abc",
            &TurnRequest::change("menu".to_string()),
        )?,
        client.build_request(
            "key-1",
            "conversation/abc",
            &TurnRequest::get(vec!["score".to_string()]),
        )?,
    ];

    for request in &requests {
        let headers = request.headers();
        assert_eq!(
            headers.get("Authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer key-1")
        );
        assert_eq!(
            headers.get("Content-Type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            headers.get("Accept").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
    Ok(())
}

#[test]
fn bodies_contain_exactly_the_supplied_keys() -> Result<(), ConversationError> {
    let client = client();

    let all_optional = StartRequest {
        time_zone_offset: Some(-300),
        participant: Some("p-1".to_string()),
        build_type: Some("sandbox".to_string()),
        ..StartRequest::new("proj-123".to_string())
    };
    let request = client.build_request("key-1", "conversation", &all_optional)?;
    assert_eq!(
        body_keys(&request),
        vec!["build_type", "participant", "project", "time_zone_offset"]
    );

    let turn = TurnRequest {
        text: Some("hi".to_string()),
        locale: Some("en-US".to_string()),
        restart_if_modified: Some(false),
        ..TurnRequest::default()
    };
    let request = client.build_request("key-1", "conversation/abc", &turn)?;
    assert_eq!(
        body_keys(&request),
        vec!["locale", "restartIfModified", "text"]
    );

    // Absent optionals never appear, not even as null
    let request = client.build_request("key-1", "conversation/abc", &TurnRequest::default())?;
    assert_eq!(body_json(&request), serde_json::json!({}));
    Ok(())
}

/// Records every target uuid and answers each call with a canned response.
struct RecordingApi {
    response: TurnResponse,
    targets: Mutex<Vec<String>>,
}

impl RecordingApi {
    fn new(response: TurnResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            targets: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl ConversationApi for RecordingApi {
    async fn start(
        &self,
        _api_key: &str,
        _request: &StartRequest,
    ) -> Result<TurnResponse, ConversationError> {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push("<start>".to_string());
        }
        Ok(self.response.clone())
    }

    async fn converse(
        &self,
        _api_key: &str,
        uuid: &str,
        _request: &TurnRequest,
    ) -> Result<TurnResponse, ConversationError> {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push(uuid.to_string());
        }
        Ok(self.response.clone())
    }
}

#[tokio::test]
async fn conversation_id_round_trips_onto_the_next_turn() -> Result<(), ConversationError> {
    let api = RecordingApi::new(TurnResponse {
        conversation: Some("abc".to_string()),
        ..TurnResponse::default()
    });
    let mut bot = Bot::new(api.clone(), "Alice", "proj-123", "key-1");

    let response = bot
        .start_conversation(&bot_gallery::pullstring::bot::StartOptions::default())
        .await?;
    assert!(bot.is_active());

    bot.adopt_conversation(&response);
    let uuid = bot.conversation.clone().unwrap_or_default();
    assert_eq!(uuid, "abc");

    bot.say(&uuid, Some("hello".to_string())).await?;

    let targets = api.targets.lock().map(|t| t.clone()).unwrap_or_default();
    assert_eq!(targets, vec!["<start>".to_string(), "abc".to_string()]);
    Ok(())
}

#[test]
fn config_bot_listing_convention() {
    assert_eq!(
        parse_bot_line("Alice, proj-123").map(|listing| (listing.name, listing.project_id)),
        Some(("Alice".to_string(), "proj-123".to_string()))
    );
    assert_eq!(parse_bot_line("just a sentence with no comma"), None);

    let response: TurnResponse = serde_json::from_str(
        r#"{
            "conversation": "cfg-1",
            "outputs": [
                {"text": "Alice, proj-123"},
                {"text": "malformed"},
                {"text": " Bob , proj-456 "}
            ]
        }"#,
    )
    .unwrap_or_default();

    let listings = parse_bot_list(&response);
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].name, "Alice");
    assert_eq!(listings[1].name, "Bob");
    assert_eq!(listings[1].project_id, "proj-456");
}
