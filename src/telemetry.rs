//! Telemetry broadcaster - periodic system load sampling
//!
//! Runs a fixed-interval loop that samples CPU and memory via sysinfo plus
//! the pool's active-worker count and the queue depth, and publishes each
//! sample as a fire-and-forget event. No backpressure, no delivery
//! guarantee; zero subscribers is not an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sysinfo::System;
use tokio::sync::broadcast;
use tracing::debug;

use crate::core::{Event, TelemetryConfig, TelemetrySample};
use crate::pool::WorkerPool;
use crate::queue::TaskQueue;

/// Periodic sampler of system load and dispatch counters
pub struct TelemetryBroadcaster {
    sys: System,
    interval: Duration,
    queue: Arc<TaskQueue>,
    pool: Arc<WorkerPool>,
    events: broadcast::Sender<Event>,
}

impl TelemetryBroadcaster {
    /// Create a broadcaster; it does nothing until [`TelemetryBroadcaster::run`]
    pub fn new(
        config: &TelemetryConfig,
        queue: Arc<TaskQueue>,
        pool: Arc<WorkerPool>,
        events: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            sys: System::new(),
            interval: Duration::from_secs(config.interval_secs),
            queue,
            pool,
            events,
        }
    }

    /// Take one sample of system load and dispatch counters
    pub fn sample(&mut self) -> TelemetrySample {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let ram_percent = if total == 0 {
            0.0
        } else {
            (self.sys.used_memory() as f64 / total as f64 * 100.0) as f32
        };

        TelemetrySample {
            cpu_percent: self.sys.global_cpu_usage(),
            ram_percent,
            active_workers: self.pool.active_workers(),
            queue_depth: self.queue.depth(),
            timestamp: Utc::now(),
        }
    }

    /// Run the sampling loop until the event channel is torn down
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            let sample = self.sample();
            debug!(
                cpu = sample.cpu_percent,
                ram = sample.ram_percent,
                workers = sample.active_workers,
                depth = sample.queue_depth,
                "telemetry sample"
            );
            let _ = self.events.send(Event::Telemetry(sample));
        }
    }
}
