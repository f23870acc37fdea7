//! Response capture: mirrors every in-scope body as it streams past
//!
//! Each agent's page carries one capture task, subscribed to the CDP
//! network events before the page navigates anywhere. Capture runs
//! interleaved with, and independently of, page-level navigation: a single
//! navigation typically produces many response events (the document plus
//! its sub-resources), and each qualifying one is persisted exactly once.
//!
//! The ledger is session-wide and shared across all agents. Narrowing it
//! to per-agent scope would reintroduce duplicate writes for resources
//! referenced from multiple pages.

use crate::storage::ArtifactSink;
use crate::KagamiError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, GetResponseBodyParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Session-wide set of URLs whose bodies have been persisted
#[derive(Debug, Default)]
pub struct CaptureLedger {
    seen: Mutex<HashSet<String>>,
}

impl CaptureLedger {
    /// Atomically claims `url`; returns false if it was already claimed.
    ///
    /// Check and mark happen under one lock so capture events arriving
    /// from different agents cannot both claim the same URL.
    pub fn try_claim(&self, url: &str) -> bool {
        self.seen.lock().unwrap().insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subscribes `page` to response events and spawns its capture task
///
/// Registration completes before this returns, so navigations started
/// afterwards cannot race past the listener. For every response with
/// status 200 whose URL contains `target` and claims fresh in the ledger,
/// the body is fetched and persisted through `store`.
///
/// A failed body fetch is logged and skipped; the URL stays claimed. A
/// failed write is fatal: it is sent on `fatal` and the task ends.
pub async fn spawn_capture(
    page: &Page,
    target: String,
    ledger: Arc<CaptureLedger>,
    store: Arc<dyn ArtifactSink>,
    fatal: mpsc::UnboundedSender<KagamiError>,
) -> crate::Result<JoinHandle<()>> {
    page.execute(EnableParams::default()).await?;
    let mut responses = page.event_listener::<EventResponseReceived>().await?;
    let page = page.clone();

    Ok(tokio::spawn(async move {
        while let Some(event) = responses.next().await {
            let url = event.response.url.clone();

            if event.response.status != 200 || !url.contains(&target) {
                continue;
            }
            if !ledger.try_claim(&url) {
                continue;
            }

            let body = match page
                .execute(GetResponseBodyParams::new(event.request_id.clone()))
                .await
            {
                Ok(response) => response.result,
                Err(e) => {
                    tracing::warn!("Could not read body of {}: {}", url, e);
                    continue;
                }
            };

            let bytes = if body.base64_encoded {
                match BASE64.decode(body.body.as_bytes()) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("Undecodable body for {}: {}", url, e);
                        continue;
                    }
                }
            } else {
                body.body.into_bytes()
            };

            if let Err(e) = store.save(&url, &bytes).await {
                // Persistence failures abort the whole session.
                let _ = fatal.send(e);
                return;
            }

            tracing::debug!("Captured {} ({} bytes)", url, bytes.len());
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_once_only() {
        let ledger = CaptureLedger::default();
        assert!(ledger.try_claim("https://ex.com/a"));
        assert!(!ledger.try_claim("https://ex.com/a"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_distinct_urls_claim_independently() {
        let ledger = CaptureLedger::default();
        assert!(ledger.try_claim("https://ex.com/a"));
        assert!(ledger.try_claim("https://ex.com/b"));
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_claims_yield_one_winner() {
        let ledger = Arc::new(CaptureLedger::default());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(
                async move { ledger.try_claim("https://ex.com/shared") },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(ledger.len(), 1);
    }
}
