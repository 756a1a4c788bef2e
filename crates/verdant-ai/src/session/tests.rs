use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::{AiError, ImageAttachment, ModelClient, Role, SessionRegistry, Turn};

use super::manager::ChatSession;
use super::types::BusyGuard;

/// Scripted collaborator: replies with a fixed string or a fixed error,
/// recording how many turns it saw on the last call.
struct ScriptedClient {
    reply: Option<String>,
    calls: AtomicUsize,
    last_turn_count: AtomicUsize,
}

impl ScriptedClient {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_turn_count: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_turn_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, _system: &str, turns: &[Turn]) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_turn_count.store(turns.len(), Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(AiError::Api("HTTP 500: upstream broke".into())),
        }
    }
}

fn session() -> ChatSession {
    ChatSession::new(Arc::from("be helpful"))
}

fn jpeg_attachment() -> ImageAttachment {
    ImageAttachment::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap()
}

#[test]
fn user_turn_is_visible_in_history_before_any_reply() {
    let mut session = session();
    session.append_user_turn("Is this a ZZ plant?".into(), Some(jpeg_attachment()));

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role(), Role::User);
    assert_eq!(history[0].parts().len(), 2);
    assert_eq!(history[0].text(), "Is this a ZZ plant?");
    assert!(history[0].has_image());
}

#[test]
fn text_only_turn_carries_no_image_part() {
    let mut session = session();
    session.append_user_turn("What's the price of a money plant?".into(), None);

    assert_eq!(session.history()[0].parts().len(), 1);
    assert!(!session.history()[0].has_image());
}

#[tokio::test]
async fn successful_send_appends_exactly_two_turns() {
    let client = ScriptedClient::replying("Rs 150, from the store files.");
    let mut session = session();

    let reply = session
        .send(&client, "What's the price of a money plant?".into(), None)
        .await
        .unwrap();

    assert_eq!(reply, "Rs 150, from the store files.");
    assert_eq!(session.turn_count(), 2);

    let assistant = &session.history()[1];
    assert_eq!(assistant.role(), Role::Assistant);
    assert_eq!(assistant.parts().len(), 1);
    assert!(!assistant.has_image());
    assert_eq!(assistant.text(), "Rs 150, from the store files.");
}

#[tokio::test]
async fn failed_send_keeps_only_the_user_turn() {
    let client = ScriptedClient::failing();
    let mut session = session();

    let before = session.turn_count();
    let err = session
        .send(&client, "hello?".into(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::Api(_)));
    assert_eq!(session.turn_count(), before + 1);
    assert_eq!(session.history()[0].role(), Role::User);
}

#[tokio::test]
async fn session_stays_usable_after_a_failure() {
    let mut session = session();

    let failing = ScriptedClient::failing();
    session.send(&failing, "first".into(), None).await.unwrap_err();

    let working = ScriptedClient::replying("second answer");
    let reply = session.send(&working, "second".into(), None).await.unwrap();

    assert_eq!(reply, "second answer");
    // dangling first question, then the completed second exchange
    assert_eq!(session.turn_count(), 3);
    // the retry carried the dangling turn as context
    assert_eq!(working.last_turn_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn reply_call_carries_full_accumulated_history() {
    let client = ScriptedClient::replying("ok");
    let mut session = session();

    session.send(&client, "one".into(), None).await.unwrap();
    session.send(&client, "two".into(), None).await.unwrap();

    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    // second call saw user/assistant/user
    assert_eq!(client.last_turn_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn busy_session_rejects_overlapping_reply() {
    let client = ScriptedClient::replying("ok");
    let mut session = session();
    session.append_user_turn("hi".into(), None);

    // Simulate a request already in flight
    session.busy.store(true, Ordering::SeqCst);
    let err = session.request_reply(&client).await.unwrap_err();

    assert!(matches!(err, AiError::Busy));
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn busy_guard_releases_on_drop() {
    let flag = AtomicBool::new(false);

    let guard = BusyGuard::acquire(&flag).unwrap();
    assert!(BusyGuard::acquire(&flag).is_err());

    drop(guard);
    assert!(BusyGuard::acquire(&flag).is_ok());
}

#[tokio::test]
async fn busy_flag_clears_after_each_reply() {
    let client = ScriptedClient::replying("ok");
    let mut session = session();

    session.send(&client, "one".into(), None).await.unwrap();
    // a second send must not see a stale busy flag
    session.send(&client, "two".into(), None).await.unwrap();
}

#[test]
fn registry_returns_same_session_for_same_scope() {
    let registry = SessionRegistry::new();
    let instruction: Arc<str> = Arc::from("be helpful");

    let first = registry.get_or_create("scope-a", &instruction);
    let second = registry.get_or_create("scope-a", &instruction);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_first_instruction_wins() {
    let registry = SessionRegistry::new();
    let first_instruction: Arc<str> = Arc::from("first");
    let second_instruction: Arc<str> = Arc::from("second");

    registry.get_or_create("scope-a", &first_instruction);
    let session = registry.get_or_create("scope-a", &second_instruction);

    assert_eq!(session.blocking_lock().system_instruction(), "first");
}

#[test]
fn registry_distinct_scopes_get_distinct_sessions() {
    let registry = SessionRegistry::new();
    let instruction: Arc<str> = Arc::from("be helpful");

    let a = registry.get_or_create("scope-a", &instruction);
    let b = registry.get_or_create("scope-b", &instruction);

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(registry.len(), 2);
}

#[test]
fn registry_remove_is_explicit_teardown() {
    let registry = SessionRegistry::new();
    let instruction: Arc<str> = Arc::from("be helpful");

    registry.get_or_create("scope-a", &instruction);
    assert!(registry.remove("scope-a"));
    assert!(!registry.remove("scope-a"));
    assert!(registry.is_empty());
    assert!(registry.get("scope-a").is_none());
}
