//! Webhook endpoint behaviour
//! Run with: cargo test --test webhook_test

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use atbash_bot::application::errors::BotError;
use atbash_bot::application::messaging::{Dispatcher, MessageParser};
use atbash_bot::domain::cipher::CipherTable;
use atbash_bot::domain::entities::OutboundReply;
use atbash_bot::domain::traits::{Bot, BotInfo};
use atbash_bot::infrastructure::adapters::telegram::webhook::{self, WebhookState, SECRET_HEADER};
use atbash_bot::infrastructure::random::SequenceRandom;
use atbash_bot::infrastructure::storage::{MemoryGameStore, MemoryStatsStore};

/// Bot that records what it would have sent
#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(String, OutboundReply)>>,
    answered: Mutex<Vec<String>>,
}

impl RecordingBot {
    fn sent(&self) -> Vec<(String, OutboundReply)> {
        self.sent.lock().unwrap().clone()
    }

    fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        self.send_reply(chat_id, &OutboundReply::new(text)).await
    }

    async fn send_reply(&self, chat_id: &str, reply: &OutboundReply) -> Result<String, BotError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id.to_string(), reply.clone()));
        Ok(sent.len().to_string())
    }

    async fn answer_callback(&self, callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "1".to_string(),
            name: "test".to_string(),
            username: "test_bot".to_string(),
        }
    }
}

fn app(bot: Arc<RecordingBot>, secret: Option<&str>) -> axum::Router {
    let dispatcher = Dispatcher::new(
        CipherTable::hebrew(),
        Arc::new(MemoryStatsStore::new()),
        Arc::new(MemoryGameStore::new()),
        Arc::new(SequenceRandom::new(vec![0])),
    );
    let state = WebhookState::new(
        bot,
        Arc::new(dispatcher),
        MessageParser::default(),
        secret.map(str::to_string),
    );
    webhook::router(state, "/telegram")
}

fn post(body: &str, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/telegram")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_HEADER, secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn text_update(update_id: i64, text: &str) -> String {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": 1,
            "from": {"id": 42},
            "chat": {"id": 42},
            "text": text
        }
    })
    .to_string()
}

/// Replies go out on a spawned task; give it a moment
async fn wait_for_sent(bot: &RecordingBot, count: usize) {
    for _ in 0..100 {
        if bot.sent().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_health() {
    let bot = Arc::new(RecordingBot::default());
    let response = app(bot, None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_text_update_gets_converted_reply() {
    let bot = Arc::new(RecordingBot::default());
    let response = app(bot.clone(), None)
        .oneshot(post(&text_update(1, "אבג"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    wait_for_sent(&bot, 1).await;
    let sent = bot.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "42");
    assert!(sent[0].1.text.contains("תשר"));
    assert_eq!(sent[0].1.menu_options.len(), 3);
}

#[tokio::test]
async fn test_secret_token_required() {
    let bot = Arc::new(RecordingBot::default());
    let router = app(bot.clone(), Some("s3cret"));

    let missing = router.clone().oneshot(post(&text_update(1, "א"), None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = router.clone().oneshot(post(&text_update(2, "א"), Some("nope"))).await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let right = router.oneshot(post(&text_update(3, "א"), Some("s3cret"))).await.unwrap();
    assert_eq!(right.status(), StatusCode::OK);

    wait_for_sent(&bot, 1).await;
    assert_eq!(bot.sent().len(), 1);
}

#[tokio::test]
async fn test_malformed_payload_is_acknowledged() {
    let bot = Arc::new(RecordingBot::default());
    let response = app(bot.clone(), None)
        .oneshot(post("{not json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(bot.sent().is_empty());
}

#[tokio::test]
async fn test_redelivered_update_processed_once() {
    let bot = Arc::new(RecordingBot::default());
    let router = app(bot.clone(), None);

    for _ in 0..3 {
        let response = router.clone().oneshot(post(&text_update(77, "שלום"), None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    wait_for_sent(&bot, 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bot.sent().len(), 1);
}

#[tokio::test]
async fn test_callback_is_answered_and_dispatched() {
    let bot = Arc::new(RecordingBot::default());
    let router = app(bot.clone(), None);

    let body = serde_json::json!({
        "update_id": 9,
        "callback_query": {
            "id": "cb-9",
            "from": {"id": 42},
            "message": {"message_id": 3, "chat": {"id": 42}},
            "data": "explain"
        }
    })
    .to_string();
    let response = router.clone().oneshot(post(&body, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    wait_for_sent(&bot, 1).await;
    assert_eq!(bot.answered(), vec!["cb-9".to_string()]);
    assert!(bot.sent()[0].1.text.contains("אתבש"));

    // Unknown tags are still answered but produce no reply
    let stale = serde_json::json!({
        "update_id": 10,
        "callback_query": {"id": "cb-10", "from": {"id": 42}, "data": "edit_1"}
    })
    .to_string();
    router.oneshot(post(&stale, None)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(bot.answered().len(), 2);
    assert_eq!(bot.sent().len(), 1);
}
