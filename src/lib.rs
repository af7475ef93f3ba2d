//! Muster - Browser-Automation Task Dispatcher
//!
//! Dispatches browser-automation work to a pool of long-lived workers,
//! accepting either explicit navigation tasks or natural-language commands
//! translated into action sequences by an LLM.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Queue**: FIFO task queue with sentinel-based shutdown
//! - **LLM**: Completion provider abstraction with Ollama implementation
//! - **Interpreter**: Natural-language command to action-sequence translation
//! - **Browser**: Session contract, agent-browser wrapper, cookie vault
//! - **Worker / Pool**: Worker state machine and the fixed-size pool
//! - **Dispatch**: Boundary entry points (deploy, submit_command, health)
//! - **Telemetry**: Periodic system load broadcasting
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use muster::{
//!     ActionInterpreter, AgentBrowserFactory, Config, Dispatcher, OllamaClient, TaskQueue,
//!     WorkerPool,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let (events, _) = tokio::sync::broadcast::channel(256);
//!
//!     let queue = Arc::new(TaskQueue::new());
//!     let factory = Arc::new(AgentBrowserFactory::new(&config.browser));
//!     let pool = Arc::new(WorkerPool::spawn(
//!         &config,
//!         Arc::clone(&queue),
//!         factory,
//!         events.clone(),
//!     ));
//!     let interpreter = Arc::new(ActionInterpreter::new(
//!         Arc::new(OllamaClient::from_config(&config)),
//!         events.clone(),
//!         config.llm.max_actions,
//!     ));
//!
//!     let dispatcher = Dispatcher::new(queue, pool, interpreter, events);
//!     dispatcher.deploy("https://example.com", 3);
//! }
//! ```

pub mod browser;
pub mod core;
pub mod dispatch;
pub mod interpreter;
pub mod llm;
pub mod pool;
pub mod queue;
pub mod telemetry;
pub mod worker;

// Re-export commonly used items
pub use browser::AgentBrowserFactory;
pub use core::{Action, Config, Event, MusterError, Result, Task, WorkerStatus};
pub use dispatch::Dispatcher;
pub use interpreter::ActionInterpreter;
pub use llm::OllamaClient;
pub use pool::WorkerPool;
pub use queue::TaskQueue;
pub use telemetry::TelemetryBroadcaster;
