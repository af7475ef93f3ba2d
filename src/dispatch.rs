//! Dispatcher - the boundary between the control surface and the core
//!
//! Translates external requests into queue operations. Both entry points
//! acknowledge immediately and unconditionally; execution outcomes are
//! observable only through the event stream. Nothing here ever blocks the
//! caller on worker execution or on the LLM.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use crate::core::{Ack, Action, Event, Health, ScrollDirection, Task, TaskOrigin};
use crate::interpreter::ActionInterpreter;
use crate::pool::WorkerPool;
use crate::queue::TaskQueue;

/// Boundary-facing dispatcher over the queue, pool, and interpreter
pub struct Dispatcher {
    queue: Arc<TaskQueue>,
    pool: Arc<WorkerPool>,
    interpreter: Arc<ActionInterpreter>,
    events: broadcast::Sender<Event>,
}

impl Dispatcher {
    /// Wire a dispatcher over already-running components
    pub fn new(
        queue: Arc<TaskQueue>,
        pool: Arc<WorkerPool>,
        interpreter: Arc<ActionInterpreter>,
        events: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            queue,
            pool,
            interpreter,
            events,
        }
    }

    /// Subscribe to the boundary event stream (log lines and telemetry)
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Enqueue `count` independent navigation tasks against a URL
    ///
    /// Each task is `[Navigate(url), Scroll(down)]`. The acknowledgement says
    /// nothing about execution.
    pub fn deploy(&self, url: &str, count: usize) -> Ack {
        for _ in 0..count {
            let task = Task::new(
                vec![
                    Action::navigate(url),
                    Action::scroll(ScrollDirection::Down),
                ],
                TaskOrigin::Manual,
            );
            self.queue.enqueue(task);
        }

        info!(url, count, "deploy accepted");
        let _ = self
            .events
            .send(Event::log(format!("Deploying {} tasks against {}", count, url)));

        Ack::accepted()
    }

    /// Interpret a natural-language command and broadcast it to all workers
    ///
    /// Interpretation runs off the request path. On success, one identical
    /// task is enqueued per currently active worker; on an empty
    /// interpretation nothing is enqueued (the interpreter has already logged
    /// the failure). The acknowledgement is returned before any of that
    /// happens.
    pub fn submit_command(&self, command: &str) -> Ack {
        let command = command.to_string();
        let queue = Arc::clone(&self.queue);
        let pool = Arc::clone(&self.pool);
        let interpreter = Arc::clone(&self.interpreter);
        let events = self.events.clone();

        tokio::spawn(async move {
            let actions = interpreter.interpret(&command).await;
            if actions.is_empty() {
                return;
            }

            // Snapshot of the active worker count at interpretation time;
            // Initializing workers count, they will drain the queue once up.
            let targets = pool.active_workers();
            for _ in 0..targets {
                queue.enqueue(Task::new(actions.clone(), TaskOrigin::Ai));
            }

            info!(targets, actions = actions.len(), "command broadcast");
            let _ = events.send(Event::ai_log(format!(
                "Broadcasting interpreted command ({} actions) to {} workers",
                actions.len(),
                targets
            )));
        });

        Ack::accepted()
    }

    /// Health report for the control surface
    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            worker_count: self.pool.active_workers(),
        }
    }

    /// Begin graceful shutdown: one sentinel per worker still consuming
    ///
    /// Outstanding tasks drain first; each worker exits at its next dequeue.
    pub fn shutdown(&self) {
        let workers = self.pool.active_workers();
        info!(workers, "shutdown requested");
        self.queue.shutdown(workers);
    }
}
