//! Muster - Browser-Automation Task Dispatcher
//!
//! Runner entry point: starts the pool and telemetry, prints the event
//! stream to stdout, and shuts down gracefully on ctrl-c. The HTTP dashboard
//! is a separate surface; this binary stands in for it on a terminal.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use muster::core::Event;
use muster::{
    ActionInterpreter, AgentBrowserFactory, Config, Dispatcher, OllamaClient, TaskQueue,
    TelemetryBroadcaster, WorkerPool,
};

/// Muster - Browser-Automation Task Dispatcher
#[derive(Parser, Debug)]
#[command(name = "muster")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of workers in the pool
    #[arg(long, short = 'w')]
    workers: Option<usize>,

    /// Deploy tasks against this URL at startup
    #[arg(long, short = 'u')]
    url: Option<String>,

    /// Number of tasks to deploy against --url
    #[arg(long, short = 'c', default_value_t = 1)]
    count: usize,

    /// Submit a natural-language command at startup
    #[arg(long)]
    command: Option<String>,

    /// Run browser sessions in headed mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "muster=debug" } else { "muster=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // Build configuration with CLI overrides
    let mut config = Config::load();

    if let Some(workers) = args.workers {
        config.pool.workers = workers;
    }

    if args.headed {
        config.browser.headed = true;
    }

    // Wire the core: queue, pool, interpreter, dispatcher, telemetry
    let (events, _) = tokio::sync::broadcast::channel(256);
    let queue = Arc::new(TaskQueue::new());
    let factory = Arc::new(AgentBrowserFactory::new(&config.browser));
    let pool = Arc::new(WorkerPool::spawn(
        &config,
        Arc::clone(&queue),
        factory,
        events.clone(),
    ));

    let interpreter = Arc::new(ActionInterpreter::new(
        Arc::new(OllamaClient::from_config(&config)),
        events.clone(),
        config.llm.max_actions,
    ));

    let dispatcher = Dispatcher::new(
        Arc::clone(&queue),
        Arc::clone(&pool),
        interpreter,
        events.clone(),
    );

    let telemetry = TelemetryBroadcaster::new(
        &config.telemetry,
        Arc::clone(&queue),
        Arc::clone(&pool),
        events.clone(),
    );
    tokio::spawn(telemetry.run());

    // Print the event stream in place of the dashboard
    let mut rx = dispatcher.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Log { message, ai_originated }) => {
                    if ai_originated {
                        println!("[ai] {}", message);
                    } else {
                        println!("{}", message);
                    }
                }
                Ok(Event::Telemetry(sample)) => {
                    println!(
                        "cpu {:.1}% | ram {:.1}% | workers {} | queue {}",
                        sample.cpu_percent,
                        sample.ram_percent,
                        sample.active_workers,
                        sample.queue_depth
                    );
                }
                // Dropped samples are fine, pick the stream back up.
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    if let Some(ref url) = args.url {
        dispatcher.deploy(url, args.count);
    }

    if let Some(ref command) = args.command {
        dispatcher.submit_command(command);
    }

    tokio::signal::ctrl_c().await?;
    println!("Shutting down: draining queue and stopping workers...");
    dispatcher.shutdown();
    pool.join().await;

    Ok(())
}
