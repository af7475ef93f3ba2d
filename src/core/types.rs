//! Shared types used across Muster modules
//!
//! Contains the action vocabulary, task structure, worker status values,
//! and the event shapes pushed to the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_scroll_direction() -> ScrollDirection {
    ScrollDirection::Down
}

fn default_wait_seconds() -> f64 {
    2.0
}

/// Scroll direction for a [`Action::Scroll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl std::fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollDirection::Up => write!(f, "up"),
            ScrollDirection::Down => write!(f, "down"),
        }
    }
}

/// One atomic browser operation within a task
///
/// This is a closed set. The serde tag layout matches the LLM response
/// contract (`{"type": "navigate", "url": ...}`), so anything outside the
/// three variants fails deserialization at the interpreter boundary and can
/// never reach a worker's execution loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Navigate the session to a URL and wait for network idle
    Navigate { url: String },
    /// Scroll the page by a bounded delta
    Scroll {
        #[serde(default = "default_scroll_direction")]
        direction: ScrollDirection,
    },
    /// Suspend the worker for a duration
    Wait {
        #[serde(default = "default_wait_seconds")]
        seconds: f64,
    },
}

impl Action {
    /// Create a navigate action
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::Navigate { url: url.into() }
    }

    /// Create a scroll action
    pub fn scroll(direction: ScrollDirection) -> Self {
        Self::Scroll { direction }
    }

    /// Create a wait action
    pub fn wait(seconds: f64) -> Self {
        Self::Wait { seconds }
    }
}

/// Where a task came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOrigin {
    /// Submitted through the deploy boundary
    Manual,
    /// Produced by the action interpreter from a natural-language command
    Ai,
}

/// One ordered sequence of actions, executed by exactly one worker
///
/// Owned by the queue between enqueue and dequeue, then by the consuming
/// worker, and dropped after execution. Tasks are never persisted or retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub actions: Vec<Action>,
    pub origin: TaskOrigin,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with a fresh id
    pub fn new(actions: Vec<Action>, origin: TaskOrigin) -> Self {
        Self {
            id: Uuid::new_v4(),
            actions,
            origin,
            created_at: Utc::now(),
        }
    }

    /// Whether this task was produced by the interpreter
    pub fn is_ai(&self) -> bool {
        self.origin == TaskOrigin::Ai
    }
}

/// Identifier of a worker within the pool (1-based, stable for the run)
pub type WorkerId = usize;

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Opening its browser session and loading the cookie vault
    Initializing,
    /// Blocked on the queue waiting for a task
    Idle,
    /// Running a task's action sequence
    Executing,
    /// Session init or teardown failed; the worker will not restart
    Crashed,
    /// Observed the shutdown sentinel and exited cleanly
    Terminated,
}

impl WorkerStatus {
    /// Whether the worker can still consume tasks
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            WorkerStatus::Initializing | WorkerStatus::Idle | WorkerStatus::Executing
        )
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerStatus::Initializing => write!(f, "initializing"),
            WorkerStatus::Idle => write!(f, "idle"),
            WorkerStatus::Executing => write!(f, "executing"),
            WorkerStatus::Crashed => write!(f, "crashed"),
            WorkerStatus::Terminated => write!(f, "terminated"),
        }
    }
}

/// One system load sample, recomputed each telemetry tick and never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub active_workers: usize,
    pub queue_depth: usize,
    pub timestamp: DateTime<Utc>,
}

/// Events pushed to boundary subscribers over the broadcast channel
///
/// Fire-and-forget: publishing with zero subscribers is not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Event {
    /// Human-readable log line for the dashboard feed
    Log {
        message: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        ai_originated: bool,
    },
    /// Periodic system load sample
    Telemetry(TelemetrySample),
}

impl Event {
    /// Create a plain log event
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
            ai_originated: false,
        }
    }

    /// Create a log event marked as AI-originated
    pub fn ai_log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
            ai_originated: true,
        }
    }
}

/// Immediate acknowledgement returned by the dispatch boundary
///
/// Unconditionally optimistic: execution outcome is only observable through
/// the event stream, never through this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    /// The only acknowledgement the boundary ever returns
    pub fn accepted() -> Self {
        Self {
            status: "accepted".to_string(),
        }
    }
}

/// Health report for the control surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub worker_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tag_layout() {
        let action: Action = serde_json::from_str(r#"{"type":"navigate","url":"https://a.io"}"#)
            .expect("navigate should parse");
        assert_eq!(action, Action::navigate("https://a.io"));
    }

    #[test]
    fn test_scroll_direction_default() {
        let action: Action = serde_json::from_str(r#"{"type":"scroll"}"#).unwrap();
        assert_eq!(action, Action::scroll(ScrollDirection::Down));
    }

    #[test]
    fn test_wait_seconds_default() {
        let action: Action = serde_json::from_str(r#"{"type":"wait"}"#).unwrap();
        assert_eq!(action, Action::wait(2.0));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: std::result::Result<Action, _> =
            serde_json::from_str(r##"{"type":"click","selector":"#a"}"##);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_activity() {
        assert!(WorkerStatus::Idle.is_active());
        assert!(WorkerStatus::Initializing.is_active());
        assert!(!WorkerStatus::Crashed.is_active());
        assert!(!WorkerStatus::Terminated.is_active());
    }
}
