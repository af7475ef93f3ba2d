//! Action interpreter - natural language to action sequences
//!
//! Turns a free-text command into a validated, bounded list of [`Action`]s
//! using one LLM completion. The contract is fail-soft: any transport
//! failure, parse failure, or schema violation yields an empty list and one
//! AI-marked failure event. Nothing propagates to the caller as an error,
//! and the interpreter never retries.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};
use url::Url;

use crate::core::{Action, Event, MusterError, Result};
use crate::llm::CompletionProvider;

/// Fixed instruction restricting the model's vocabulary to the three
/// supported action types.
const SYSTEM_INSTRUCTION: &str = r#"You translate browser-automation commands into a JSON plan.
Respond with a single JSON object of the form {"actions": [...]}.
Each element must be one of:
  {"type": "navigate", "url": "<absolute url>"}
  {"type": "scroll", "direction": "up" | "down"}
  {"type": "wait", "seconds": <number>}
Use only these three action types. Do not include any other keys or any text
outside the JSON object."#;

/// Translates free-text commands into action sequences
pub struct ActionInterpreter {
    provider: Arc<dyn CompletionProvider>,
    events: broadcast::Sender<Event>,
    max_actions: usize,
}

impl ActionInterpreter {
    /// Create an interpreter over the given completion backend
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        events: broadcast::Sender<Event>,
        max_actions: usize,
    ) -> Self {
        Self {
            provider,
            events,
            max_actions,
        }
    }

    /// Interpret a command into an ordered action sequence
    ///
    /// Returns an empty vector on any failure; emits exactly one AI-marked
    /// failure event in that case.
    pub async fn interpret(&self, command: &str) -> Vec<Action> {
        match self.try_interpret(command).await {
            Ok(actions) => {
                debug!(
                    provider = self.provider.name(),
                    count = actions.len(),
                    "command interpreted"
                );
                actions
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "interpretation failed");
                let _ = self
                    .events
                    .send(Event::ai_log(format!("Command interpretation failed: {}", e)));
                Vec::new()
            }
        }
    }

    async fn try_interpret(&self, command: &str) -> Result<Vec<Action>> {
        let raw = self.provider.complete(SYSTEM_INSTRUCTION, command).await?;
        self.parse_plan(&raw)
    }

    /// Parse and validate the model's response
    ///
    /// The response must be a JSON object with an `actions` array whose
    /// elements all match one of the closed action shapes.
    fn parse_plan(&self, raw: &str) -> Result<Vec<Action>> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| MusterError::interpretation(format!("response is not JSON: {}", e)))?;

        let items = value
            .get("actions")
            .and_then(|a| a.as_array())
            .ok_or_else(|| MusterError::interpretation("response has no 'actions' array"))?;

        let mut actions = Vec::with_capacity(items.len().min(self.max_actions));
        for item in items {
            let action: Action = serde_json::from_value(item.clone())
                .map_err(|e| MusterError::interpretation(format!("unknown action shape: {}", e)))?;
            validate(&action)?;
            actions.push(action);
            if actions.len() == self.max_actions {
                // Bounded plan: excess actions are dropped, not an error.
                break;
            }
        }

        Ok(actions)
    }
}

/// Reject actions whose fields cannot be executed
fn validate(action: &Action) -> Result<()> {
    match action {
        Action::Navigate { url } => {
            Url::parse(url)
                .map_err(|e| MusterError::interpretation(format!("invalid url '{}': {}", url, e)))?;
        }
        Action::Wait { seconds } => {
            // Duration::from_secs_f64 panics outside this range.
            if !seconds.is_finite() || *seconds < 0.0 || *seconds > 86_400.0 {
                return Err(MusterError::interpretation(format!(
                    "invalid wait duration: {}",
                    seconds
                )));
            }
        }
        Action::Scroll { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScrollDirection;
    use async_trait::async_trait;

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

    fn with_response(response: &str) -> (ActionInterpreter, broadcast::Receiver<Event>) {
        let (tx, rx) = broadcast::channel(16);
        let interpreter =
            ActionInterpreter::new(Arc::new(CannedProvider(response.to_string())), tx, 25);
        (interpreter, rx)
    }

    #[tokio::test]
    async fn test_well_formed_plan() {
        let (interpreter, _rx) = with_response(
            r#"{"actions":[{"type":"navigate","url":"https://x.io"},{"type":"scroll","direction":"down"}]}"#,
        );
        let actions = interpreter.interpret("check the site").await;
        assert_eq!(
            actions,
            vec![
                Action::navigate("https://x.io"),
                Action::scroll(ScrollDirection::Down),
            ]
        );
    }

    #[tokio::test]
    async fn test_plan_is_bounded() {
        let many: Vec<String> = (0..40).map(|_| r#"{"type":"scroll"}"#.to_string()).collect();
        let response = format!(r#"{{"actions":[{}]}}"#, many.join(","));
        let (interpreter, _rx) = with_response(&response);
        let actions = interpreter.interpret("scroll forever").await;
        assert_eq!(actions.len(), 25);
    }

    #[tokio::test]
    async fn test_relative_url_rejected() {
        let (interpreter, mut rx) =
            with_response(r#"{"actions":[{"type":"navigate","url":"not a url"}]}"#);
        let actions = interpreter.interpret("go somewhere").await;
        assert!(actions.is_empty());
        assert!(matches!(rx.try_recv(), Ok(Event::Log { ai_originated: true, .. })));
    }

    #[tokio::test]
    async fn test_negative_wait_rejected() {
        let (interpreter, _rx) = with_response(r#"{"actions":[{"type":"wait","seconds":-3}]}"#);
        assert!(interpreter.interpret("wait").await.is_empty());
    }
}
