//! Crawl scheduler: dispatch, first-completion wait, collect
//!
//! One logical control flow drives many in-flight fetches. Each turn of
//! the loop fills every idle agent from the frontier, suspends until at
//! least one task finishes (not all of them — a freed agent goes straight
//! back to work instead of waiting on the slowest fetch), collects
//! everything that finished, and goes again. The session ends when the
//! frontier is empty and no task is outstanding.

use crate::crawler::agent::{FetchOutcome, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::pool::WorkerPool;
use crate::progress::ProgressSink;
use crate::{KagamiError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// A finished fetch task: the agent comes back with its outcome
struct TaskFinish<A> {
    agent: A,
    outcome: FetchOutcome,
}

/// Drives one crawl session over a pool of fetch agents
pub struct Scheduler<A: Fetcher + 'static> {
    frontier: Frontier,
    pool: WorkerPool<A>,
    tasks: JoinSet<TaskFinish<A>>,
    progress: Box<dyn ProgressSink>,
    fatal_rx: mpsc::UnboundedReceiver<KagamiError>,
}

impl<A: Fetcher + 'static> Scheduler<A> {
    /// Creates a scheduler over a seeded frontier and a full pool.
    ///
    /// `fatal_rx` carries errors from the capture tasks; the first one
    /// received aborts the session. Sessions without capture pass a
    /// receiver whose senders are already dropped.
    pub fn new(
        frontier: Frontier,
        pool: WorkerPool<A>,
        progress: Box<dyn ProgressSink>,
        fatal_rx: mpsc::UnboundedReceiver<KagamiError>,
    ) -> Self {
        Self {
            frontier,
            pool,
            tasks: JoinSet::new(),
            progress,
            fatal_rx,
        }
    }

    /// Runs the crawl to completion.
    ///
    /// Returns early with the error if a capture task reports a fatal
    /// write failure or a worker panics; any tasks still in flight are
    /// waited out before returning either way.
    pub async fn run(&mut self) -> Result<()> {
        let result = self.crawl_loop().await;
        self.drain().await;

        // A write failure from the final collection batch may land after
        // the loop has already exited; it still fails the session.
        if result.is_ok() {
            if let Ok(fatal) = self.fatal_rx.try_recv() {
                return Err(fatal);
            }
        }

        result
    }

    async fn crawl_loop(&mut self) -> Result<()> {
        loop {
            self.dispatch();

            if self.tasks.is_empty() {
                // Frontier drained and nothing outstanding.
                return Ok(());
            }

            self.wait_and_collect().await?;
        }
    }

    /// Fills every currently idle agent with a pending URL.
    fn dispatch(&mut self) {
        let batch = self.frontier.take_batch(self.pool.idle_count());
        for url in batch {
            let Some(mut agent) = self.pool.acquire() else {
                // take_batch is capped by idle_count, so this branch is
                // unreachable; requeue rather than lose the URL.
                self.frontier.requeue(url);
                break;
            };
            self.tasks.spawn(async move {
                let outcome = agent.fetch(&url).await;
                TaskFinish { agent, outcome }
            });
        }
    }

    /// Suspends until at least one task completes, then collects every
    /// task that has finished by that point.
    async fn wait_and_collect(&mut self) -> Result<()> {
        let first = tokio::select! {
            joined = self.tasks.join_next() => joined,
            Some(fatal) = self.fatal_rx.recv() => return Err(fatal),
        };

        let mut finished = Vec::new();
        if let Some(joined) = first {
            finished.push(joined?);
        }
        while let Some(joined) = self.tasks.try_join_next() {
            finished.push(joined?);
        }

        for TaskFinish { agent, outcome } in finished {
            self.pool.release(agent);
            match outcome {
                FetchOutcome::Success { links } => self.frontier.absorb(links),
                FetchOutcome::Failed { url, reason } => {
                    tracing::warn!("Requeueing {} after failure: {}", url, reason);
                    self.frontier.requeue(url);
                }
            }
        }

        let completed = self.frontier.dispatched_len();
        let total = completed + self.frontier.pending_len();
        self.progress.update(completed, total);

        Ok(())
    }

    /// Waits out any task still in flight, returning agents to the pool.
    /// The main loop only exits with an empty task set, so this matters
    /// on early error returns.
    async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Ok(finish) = joined {
                self.pool.release(finish.agent);
            }
        }
    }

    /// The frontier, for post-run inspection.
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }
}
