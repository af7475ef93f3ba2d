//! Worker pool - fixed-size collection of isolated workers
//!
//! Created once at startup; the pool never grows and never self-heals. Each
//! worker reports status transitions over a channel to a registry owned
//! here, which the dispatcher and telemetry read. Workers share nothing but
//! the queue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::browser::SessionFactory;
use crate::core::{Config, Event, WorkerId, WorkerStatus};
use crate::queue::TaskQueue;
use crate::worker::{StatusUpdate, Worker, WorkerSettings};

/// A fixed-size pool of running workers plus their status registry
pub struct WorkerPool {
    initial_size: usize,
    registry: Arc<Mutex<HashMap<WorkerId, WorkerStatus>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    registry_task: JoinHandle<()>,
}

impl WorkerPool {
    /// Spawn `config.pool.workers` workers against the given queue
    pub fn spawn(
        config: &Config,
        queue: Arc<TaskQueue>,
        factory: Arc<dyn SessionFactory>,
        events: broadcast::Sender<Event>,
    ) -> Self {
        let size = config.pool.workers;
        let registry: Arc<Mutex<HashMap<WorkerId, WorkerStatus>>> =
            Arc::new(Mutex::new(HashMap::with_capacity(size)));

        let (status_tx, mut status_rx) = mpsc::unbounded_channel::<StatusUpdate>();

        // Registry task: the single writer of worker statuses.
        let registry_task = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                while let Some(update) = status_rx.recv().await {
                    let mut statuses = registry.lock().expect("registry poisoned");
                    statuses.insert(update.worker_id, update.status);
                }
            })
        };

        let mut handles = Vec::with_capacity(size);
        for worker_id in 1..=size {
            registry
                .lock()
                .expect("registry poisoned")
                .insert(worker_id, WorkerStatus::Initializing);

            let worker = Worker::new(
                worker_id,
                WorkerSettings::for_worker(config, worker_id),
                Arc::clone(&queue),
                Arc::clone(&factory),
                status_tx.clone(),
                events.clone(),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        info!(workers = size, "worker pool started");

        Self {
            initial_size: size,
            registry,
            handles: Mutex::new(handles),
            registry_task,
        }
    }

    /// Pool size at startup; the live count only ever shrinks from this
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Count of workers that can still consume tasks
    pub fn active_workers(&self) -> usize {
        self.registry
            .lock()
            .expect("registry poisoned")
            .values()
            .filter(|status| status.is_active())
            .count()
    }

    /// Snapshot of every worker's current status
    pub fn statuses(&self) -> HashMap<WorkerId, WorkerStatus> {
        self.registry.lock().expect("registry poisoned").clone()
    }

    /// Wait for every worker to reach Terminated or Crashed
    pub async fn join(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut guard = self.handles.lock().expect("pool handles poisoned");
            guard.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
        self.registry_task.abort();
    }
}
