//! Task queue - FIFO dispatch channel between the boundary and the workers
//!
//! Multiple producers (dispatcher, broadcast logic) and a fixed set of
//! consumers (workers). Enqueue never blocks; dequeue parks the calling
//! worker until an item or a shutdown sentinel arrives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::core::Task;

/// An entry pulled off the queue by a worker
#[derive(Debug)]
pub enum QueueItem {
    /// Real work
    Work(Task),
    /// Shutdown sentinel: the worker that dequeues this exits its loop
    /// instead of executing anything. One sentinel stops exactly one worker.
    Shutdown,
}

/// FIFO queue of tasks, safe for concurrent producers and consumers
///
/// Order is preserved per producer: the enqueue order of a single producer is
/// the dequeue order of those items. No ordering is guaranteed across
/// producers beyond the queue's own FIFO.
pub struct TaskQueue {
    items: Mutex<VecDeque<QueueItem>>,
    notify: Notify,
    /// Count of real tasks currently queued (sentinels excluded). May lag the
    /// queue contents by a moment; telemetry tolerates staleness.
    depth: AtomicUsize,
}

impl TaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            depth: AtomicUsize::new(0),
        }
    }

    /// Append a task to the tail. Never blocks.
    pub fn enqueue(&self, task: Task) {
        {
            let mut items = self.items.lock().expect("task queue poisoned");
            items.push_back(QueueItem::Work(task));
        }
        self.depth.fetch_add(1, Ordering::Relaxed);
        self.notify.notify_one();
    }

    /// Enqueue one shutdown sentinel per worker that should stop
    pub fn shutdown(&self, workers: usize) {
        {
            let mut items = self.items.lock().expect("task queue poisoned");
            for _ in 0..workers {
                items.push_back(QueueItem::Shutdown);
            }
        }
        for _ in 0..workers {
            self.notify.notify_one();
        }
    }

    /// Remove and return the head, waiting until an item is available
    ///
    /// Exactly one caller receives each item. Waiters drain the queue before
    /// re-parking, so no item is ever stranded behind a missed wakeup.
    pub async fn dequeue(&self) -> QueueItem {
        loop {
            if let Some(item) = self.try_dequeue() {
                return item;
            }
            self.notify.notified().await;
        }
    }

    /// Pop the head if one is present
    fn try_dequeue(&self) -> Option<QueueItem> {
        let item = {
            let mut items = self.items.lock().expect("task queue poisoned");
            items.pop_front()
        };
        if matches!(item, Some(QueueItem::Work(_))) {
            self.depth.fetch_sub(1, Ordering::Relaxed);
        }
        item
    }

    /// Current count of queued tasks (sentinels excluded)
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
