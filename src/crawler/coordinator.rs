//! Crawl session wiring
//!
//! Builds every collaborator for one session — browser, agents with their
//! capture tasks, artifact store, capture ledger, frontier, pool — hands
//! them to the scheduler, and tears the session down afterwards.

use crate::config::CrawlConfig;
use crate::crawler::agent::BrowserAgent;
use crate::crawler::browser::launch_browser;
use crate::crawler::capture::{spawn_capture, CaptureLedger};
use crate::crawler::frontier::Frontier;
use crate::crawler::pool::WorkerPool;
use crate::crawler::scheduler::Scheduler;
use crate::progress::LogProgress;
use crate::storage::{ArtifactSink, FsStore};
use crate::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a finished session leaves behind
#[derive(Debug, Clone, Copy)]
pub struct CrawlStats {
    /// URLs handed to an agent at least once
    pub pages_visited: usize,

    /// Response bodies persisted to the mirror
    pub artifacts_saved: usize,
}

/// Runs one complete crawl session
///
/// Launches the browser, creates exactly `workers` pages (each with its
/// response-capture subscription registered before first use), seeds the
/// frontier with the target, and drives the scheduler until the frontier
/// is exhausted.
///
/// # Arguments
///
/// * `config` - The validated session configuration
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Session ran to completion
/// * `Err(KagamiError)` - Launch failed, a worker panicked, or an
///   artifact write failed
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlStats> {
    tracing::info!(
        "Mirroring {} into {} with {} worker(s)",
        config.target,
        config.out_dir,
        config.workers
    );

    let store: Arc<dyn ArtifactSink> = Arc::new(FsStore::new(&config.out_dir));
    let ledger = Arc::new(CaptureLedger::default());
    let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();

    let (mut browser, pump) = launch_browser().await?;

    let mut agents = Vec::with_capacity(config.workers);
    let mut captures = Vec::with_capacity(config.workers);
    for _ in 0..config.workers {
        let page = browser.new_page("about:blank").await?;
        let capture = spawn_capture(
            &page,
            config.target.clone(),
            ledger.clone(),
            store.clone(),
            fatal_tx.clone(),
        )
        .await?;
        captures.push(capture);
        agents.push(BrowserAgent::new(
            page,
            config.target.clone(),
            config.settle(),
        ));
    }
    drop(fatal_tx);

    let mut scheduler = Scheduler::new(
        Frontier::seeded(&config.target),
        WorkerPool::new(agents),
        Box::new(LogProgress),
        fatal_rx,
    );
    let outcome = scheduler.run().await;

    for capture in captures {
        capture.abort();
    }
    if let Err(e) = browser.close().await {
        tracing::warn!("Browser did not close cleanly: {}", e);
    }
    let _ = browser.wait().await;
    pump.abort();

    let stats = CrawlStats {
        pages_visited: scheduler.frontier().dispatched_len(),
        artifacts_saved: ledger.len(),
    };
    tracing::info!(
        "Crawl finished: {} pages visited, {} artifacts saved",
        stats.pages_visited,
        stats.artifacts_saved
    );

    outcome.map(|()| stats)
}
