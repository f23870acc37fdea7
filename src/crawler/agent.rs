//! Fetch agents: one reusable browser page per worker slot
//!
//! [`Fetcher`] is the seam between the scheduler and the rendering engine;
//! scheduler tests script it, the real session plugs in [`BrowserAgent`].

use crate::crawler::parser::page_links;
use crate::Result;
use async_trait::async_trait;
use chromiumoxide::Page;
use std::collections::HashSet;
use std::time::Duration;

/// Outcome of one dispatched fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// Navigation and extraction succeeded
    Success {
        /// Deduplicated in-scope links discovered on the page
        links: HashSet<String>,
    },

    /// Something went wrong; the URL comes back for requeueing
    Failed {
        /// The URL that was being fetched
        url: String,
        /// Human-readable cause, for the diagnostic log only
        reason: String,
    },
}

/// A reusable fetch agent bound to one worker slot
#[async_trait]
pub trait Fetcher: Send {
    /// Navigates to `url` and returns the page's in-scope link set, or a
    /// failure carrying `url` back. Implementations must never return a
    /// partial link set on failure.
    async fn fetch(&mut self, url: &str) -> FetchOutcome;
}

/// Browser-rendering fetch agent: one headless-Chrome page
pub struct BrowserAgent {
    page: Page,
    target: String,
    settle: Duration,
}

impl BrowserAgent {
    pub fn new(page: Page, target: String, settle: Duration) -> Self {
        Self {
            page,
            target,
            settle,
        }
    }

    /// Navigates, lets dynamic content settle, and serializes the DOM.
    ///
    /// The settle delay is fixed, not content-aware; pages that render
    /// slower than it simply yield fewer anchors.
    async fn rendered_html(&self, url: &str) -> Result<String> {
        self.page.goto(url).await?;
        tokio::time::sleep(self.settle).await;
        Ok(self.page.content().await?)
    }
}

#[async_trait]
impl Fetcher for BrowserAgent {
    async fn fetch(&mut self, url: &str) -> FetchOutcome {
        match self.rendered_html(url).await {
            Ok(html) => FetchOutcome::Success {
                links: page_links(&self.target, &html),
            },
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                FetchOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
