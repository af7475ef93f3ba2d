//! Worker - persistent unit of execution owning one browser session
//!
//! State machine: Initializing → Idle ⇄ Executing → Idle (loop), leaving via
//! Terminated (shutdown sentinel) or Crashed (fatal failure while opening or
//! tearing down the session). A failing action abandons the rest of its task
//! and returns the worker to Idle; a single bad task never crashes a worker.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use crate::browser::{vault, SessionFactory};
use crate::core::{Action, Config, Event, Result, Task, WorkerId, WorkerStatus};
use crate::queue::{QueueItem, TaskQueue};

/// One status transition, reported to the pool's registry
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
}

/// Per-worker settings derived from the pool and browser config
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Isolated session name, unique within the pool
    pub session_name: String,
    /// This worker's cookie vault file
    pub vault_path: PathBuf,
    /// Randomized post-task cooldown bounds, seconds
    pub cooldown_secs: (u64, u64),
    /// Randomized scroll delta bounds, pixels
    pub scroll_px: (u32, u32),
}

impl WorkerSettings {
    /// Derive one worker's settings from the shared config
    pub fn for_worker(config: &Config, worker_id: WorkerId) -> Self {
        Self {
            session_name: config.session_name(worker_id),
            vault_path: config.vault_path(worker_id),
            cooldown_secs: (config.pool.cooldown_min_secs, config.pool.cooldown_max_secs),
            scroll_px: (config.browser.scroll_min_px, config.browser.scroll_max_px),
        }
    }
}

/// A persistent worker consuming tasks from the queue
pub struct Worker {
    id: WorkerId,
    settings: WorkerSettings,
    queue: Arc<TaskQueue>,
    factory: Arc<dyn SessionFactory>,
    status_tx: mpsc::UnboundedSender<StatusUpdate>,
    events: broadcast::Sender<Event>,
}

impl Worker {
    /// Create a worker; it does nothing until [`Worker::run`] is awaited
    pub fn new(
        id: WorkerId,
        settings: WorkerSettings,
        queue: Arc<TaskQueue>,
        factory: Arc<dyn SessionFactory>,
        status_tx: mpsc::UnboundedSender<StatusUpdate>,
        events: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            id,
            settings,
            queue,
            factory,
            status_tx,
            events,
        }
    }

    /// Run the worker to completion
    ///
    /// Returns only once the worker has reached Terminated or Crashed.
    pub async fn run(mut self) {
        self.set_status(WorkerStatus::Initializing);
        self.log(format!("Worker {}: Initializing session...", self.id));

        let mut session = match self.factory.open(&self.settings.session_name).await {
            Ok(session) => session,
            Err(e) => {
                // Fatal: no auto-restart, the pool only ever shrinks.
                error!(worker = self.id, error = %e, "session init failed");
                self.log(format!("Worker {}: Critical failure: {}", self.id, e));
                self.set_status(WorkerStatus::Crashed);
                return;
            }
        };

        self.load_vault(session.as_mut()).await;

        loop {
            self.set_status(WorkerStatus::Idle);
            let task = match self.queue.dequeue().await {
                QueueItem::Work(task) => task,
                QueueItem::Shutdown => break,
            };

            self.set_status(WorkerStatus::Executing);
            self.execute_task(session.as_mut(), &task).await;
            self.cooldown().await;
        }

        // Sentinel observed: tear the session down and exit permanently.
        match session.close().await {
            Ok(()) => {
                info!(worker = self.id, "worker terminated");
                self.log(format!("Worker {}: Terminated.", self.id));
                self.set_status(WorkerStatus::Terminated);
            }
            Err(e) => {
                error!(worker = self.id, error = %e, "session teardown failed");
                self.log(format!("Worker {}: Critical failure: {}", self.id, e));
                self.set_status(WorkerStatus::Crashed);
            }
        }
    }

    /// Load this worker's cookie vault, if one exists. Never fatal.
    async fn load_vault(&self, session: &mut dyn crate::browser::BrowserSession) {
        if !self.settings.vault_path.exists() {
            return;
        }
        match vault::load(&self.settings.vault_path) {
            Ok(cookies) => {
                if let Err(e) = session.add_cookies(&cookies).await {
                    warn!(worker = self.id, error = %e, "cookie load failed");
                } else {
                    info!(worker = self.id, count = cookies.len(), "vault loaded");
                }
            }
            Err(e) => {
                warn!(worker = self.id, error = %e, "ignoring malformed vault");
            }
        }
    }

    /// Execute one task's actions strictly in order
    ///
    /// The first failing action abandons the remainder; the failure is logged
    /// and the worker goes back to the queue.
    async fn execute_task(
        &self,
        session: &mut dyn crate::browser::BrowserSession,
        task: &Task,
    ) {
        for (index, action) in task.actions.iter().enumerate() {
            if let Err(e) = self.execute_action(session, action).await {
                warn!(worker = self.id, task = %task.id, action = index, error = %e, "action failed");
                let message = format!(
                    "Worker {}: Task {} failed at action {}: {}",
                    self.id, task.id, index, e
                );
                if task.is_ai() {
                    self.log_event(Event::ai_log(message));
                } else {
                    self.log(message);
                }
                return;
            }
        }

        info!(worker = self.id, task = %task.id, "task complete");
        self.log(format!("Worker {}: Task {} complete.", self.id, task.id));
    }

    /// Dispatch one action to its handler
    async fn execute_action(
        &self,
        session: &mut dyn crate::browser::BrowserSession,
        action: &Action,
    ) -> Result<()> {
        match action {
            Action::Navigate { url } => session.navigate(url).await,
            Action::Scroll { direction } => {
                let (min, max) = self.settings.scroll_px;
                let pixels = rand::rng().random_range(min..=max);
                session.scroll(*direction, pixels).await
            }
            Action::Wait { seconds } => {
                tokio::time::sleep(Duration::from_secs_f64(*seconds)).await;
                Ok(())
            }
        }
    }

    /// Sleep for a randomized interval, throttling execution cadence
    async fn cooldown(&self) {
        let (min, max) = self.settings.cooldown_secs;
        let secs = rand::rng().random_range(min..=max);
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    fn set_status(&self, status: WorkerStatus) {
        let _ = self.status_tx.send(StatusUpdate {
            worker_id: self.id,
            status,
        });
    }

    fn log(&self, message: String) {
        self.log_event(Event::log(message));
    }

    fn log_event(&self, event: Event) {
        // Fire-and-forget; no subscribers is fine.
        let _ = self.events.send(event);
    }
}
