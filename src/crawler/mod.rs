//! Crawl engine
//!
//! This module contains the breadth-first crawl core:
//! - Frontier bookkeeping (pending/dispatched sets)
//! - The fixed-capacity worker pool of fetch agents
//! - The dispatch/collect scheduler with first-completion waiting
//! - Browser-backed fetch agents and response capture
//! - Session wiring and teardown

mod agent;
mod browser;
mod capture;
mod coordinator;
mod frontier;
mod parser;
mod pool;
mod scheduler;

pub use agent::{BrowserAgent, FetchOutcome, Fetcher};
pub use browser::launch_browser;
pub use capture::{spawn_capture, CaptureLedger};
pub use coordinator::{run_crawl, CrawlStats};
pub use frontier::Frontier;
pub use parser::{extract_hrefs, page_links, resolve_href};
pub use pool::WorkerPool;
pub use scheduler::Scheduler;
