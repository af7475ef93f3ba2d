//! Interpreter contract tests
//!
//! Exercises the fail-soft translation contract against stubbed completion
//! providers: well-formed plans come back as action sequences, everything
//! else comes back empty with exactly one failure event.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use muster::core::{Action, Event, MusterError, Result, ScrollDirection};
use muster::interpreter::ActionInterpreter;
use muster::llm::CompletionProvider;

/// Provider that returns a canned response body
struct CannedProvider(String);

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Provider whose transport always fails
struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(MusterError::llm("connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn with_provider(
    provider: impl CompletionProvider + 'static,
) -> (ActionInterpreter, broadcast::Receiver<Event>) {
    let (tx, rx) = broadcast::channel(16);
    (ActionInterpreter::new(Arc::new(provider), tx, 25), rx)
}

/// Count buffered failure log events without blocking
fn drain_failure_events(rx: &mut broadcast::Receiver<Event>) -> usize {
    let mut count = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, Event::Log { ai_originated: true, .. }) {
            count += 1;
        }
    }
    count
}

#[tokio::test]
async fn test_stubbed_response_yields_actions() {
    let (interpreter, _rx) = with_provider(CannedProvider(
        r##"{"actions":[{"type":"navigate","url":"https://x.io"},{"type":"scroll","direction":"down"}]}"##
            .to_string(),
    ));

    let actions = interpreter.interpret("visit x and look around").await;
    assert_eq!(
        actions,
        vec![
            Action::navigate("https://x.io"),
            Action::scroll(ScrollDirection::Down),
        ]
    );
}

#[tokio::test]
async fn test_omitted_fields_get_defaults() {
    let (interpreter, _rx) = with_provider(CannedProvider(
        r##"{"actions":[{"type":"scroll"},{"type":"wait"}]}"##.to_string(),
    ));

    let actions = interpreter.interpret("scroll a bit then pause").await;
    assert_eq!(
        actions,
        vec![Action::scroll(ScrollDirection::Down), Action::wait(2.0)]
    );
}

#[tokio::test]
async fn test_non_json_response_is_empty_with_one_event() {
    let (interpreter, mut rx) =
        with_provider(CannedProvider("Sure! Here is your plan: ...".to_string()));

    let actions = interpreter.interpret("do something").await;
    assert!(actions.is_empty());
    assert_eq!(drain_failure_events(&mut rx), 1);
}

#[tokio::test]
async fn test_missing_actions_key_is_empty_with_one_event() {
    let (interpreter, mut rx) =
        with_provider(CannedProvider(r#"{"plan":["navigate"]}"#.to_string()));

    let actions = interpreter.interpret("do something").await;
    assert!(actions.is_empty());
    assert_eq!(drain_failure_events(&mut rx), 1);
}

#[tokio::test]
async fn test_unknown_action_type_is_empty_with_one_event() {
    let (interpreter, mut rx) = with_provider(CannedProvider(
        r##"{"actions":[{"type":"navigate","url":"https://x.io"},{"type":"click","selector":"#ok"}]}"##
            .to_string(),
    ));

    // One bad element poisons the whole plan.
    let actions = interpreter.interpret("click ok").await;
    assert!(actions.is_empty());
    assert_eq!(drain_failure_events(&mut rx), 1);
}

#[tokio::test]
async fn test_transport_failure_is_empty_with_one_event() {
    let (interpreter, mut rx) = with_provider(FailingProvider);

    let actions = interpreter.interpret("anything").await;
    assert!(actions.is_empty());
    assert_eq!(drain_failure_events(&mut rx), 1);
}

#[tokio::test]
async fn test_no_subscribers_is_not_an_error() {
    let (tx, rx) = broadcast::channel(16);
    drop(rx);
    let interpreter =
        ActionInterpreter::new(Arc::new(CannedProvider("garbage".to_string())), tx, 25);

    // Failure event publishing with zero receivers must not panic or error.
    assert!(interpreter.interpret("anything").await.is_empty());
}
