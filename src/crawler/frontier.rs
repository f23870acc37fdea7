//! Crawl frontier bookkeeping
//!
//! Two sets drive the crawl: `pending` (URLs known but not yet handed to an
//! agent) and `dispatched` (URLs handed to an agent at least once).
//! Dispatched is a dispatch marker, not a success marker: a failed URL
//! re-enters pending through [`Frontier::requeue`], which deliberately
//! bypasses the dispatched filter that [`Frontier::absorb`] applies to
//! newly discovered links. That keeps a URL retriable after a failure
//! while preventing the same path, rediscovered through two different
//! referring pages, from being dispatched twice.

use std::collections::HashSet;

/// Pending/dispatched URL sets for one crawl session
#[derive(Debug, Default)]
pub struct Frontier {
    pending: HashSet<String>,
    dispatched: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding the single seed URL.
    pub fn seeded(seed: &str) -> Self {
        let mut pending = HashSet::new();
        pending.insert(seed.to_string());
        Self {
            pending,
            dispatched: HashSet::new(),
        }
    }

    /// Moves up to `max` URLs from pending into dispatched and returns them.
    ///
    /// Removal happens at take time, so a URL can never be handed to two
    /// agents in the same batch. URLs left in pending (including requeued
    /// ones awaiting retry) stay there untouched.
    pub fn take_batch(&mut self, max: usize) -> Vec<String> {
        let batch: Vec<String> = self.pending.iter().take(max).cloned().collect();
        for url in &batch {
            self.pending.remove(url);
            self.dispatched.insert(url.clone());
        }
        batch
    }

    /// Re-adds a failed URL to pending regardless of dispatched membership.
    pub fn requeue(&mut self, url: String) {
        self.pending.insert(url);
    }

    /// Adds every link that has never been dispatched to pending.
    ///
    /// Links already mid-retry sit in both sets; they are not added twice.
    pub fn absorb(&mut self, links: HashSet<String>) {
        for link in links {
            if !self.dispatched.contains(&link) {
                self.pending.insert(link);
            }
        }
    }

    /// Returns true while any URL is waiting to be dispatched.
    pub fn has_work(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn dispatched_len(&self) -> usize {
        self.dispatched.len()
    }

    /// Whether `url` has ever been handed to an agent.
    pub fn is_dispatched(&self, url: &str) -> bool {
        self.dispatched.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(urls: &[&str]) -> HashSet<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_seeded_frontier_has_work() {
        let frontier = Frontier::seeded("https://example.com");
        assert!(frontier.has_work());
        assert_eq!(frontier.pending_len(), 1);
        assert_eq!(frontier.dispatched_len(), 0);
    }

    #[test]
    fn test_take_batch_marks_dispatched() {
        let mut frontier = Frontier::seeded("https://example.com");
        let batch = frontier.take_batch(5);

        assert_eq!(batch, vec!["https://example.com".to_string()]);
        assert!(!frontier.has_work());
        assert!(frontier.is_dispatched("https://example.com"));
    }

    #[test]
    fn test_take_batch_respects_max() {
        let mut frontier = Frontier::seeded("https://example.com");
        frontier.absorb(links(&["https://example.com/a", "https://example.com/b"]));

        let batch = frontier.take_batch(2);
        assert_eq!(batch.len(), 2);
        assert_eq!(frontier.pending_len(), 1);
        assert_eq!(frontier.dispatched_len(), 2);
    }

    #[test]
    fn test_take_batch_zero() {
        let mut frontier = Frontier::seeded("https://example.com");
        assert!(frontier.take_batch(0).is_empty());
        assert!(frontier.has_work());
    }

    #[test]
    fn test_absorb_filters_dispatched() {
        let mut frontier = Frontier::seeded("https://example.com");
        frontier.take_batch(1);

        frontier.absorb(links(&["https://example.com", "https://example.com/a"]));
        assert_eq!(frontier.pending_len(), 1);

        let batch = frontier.take_batch(5);
        assert_eq!(batch, vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_requeue_bypasses_dispatched_filter() {
        let mut frontier = Frontier::seeded("https://example.com");
        frontier.take_batch(1);

        frontier.requeue("https://example.com".to_string());
        assert!(frontier.has_work());

        // The retried URL can be taken again.
        let batch = frontier.take_batch(1);
        assert_eq!(batch, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_requeued_url_survives_later_batches() {
        let mut frontier = Frontier::seeded("https://example.com");
        frontier.take_batch(1);
        frontier.requeue("https://example.com".to_string());
        frontier.absorb(links(&["https://example.com/a", "https://example.com/b"]));

        // A partial batch must not drop the requeued URL still pending.
        frontier.take_batch(1);
        let remaining = frontier.take_batch(5);
        assert_eq!(remaining.len(), 2);
        assert_eq!(frontier.pending_len(), 0);
        assert_eq!(frontier.dispatched_len(), 3);
    }

    #[test]
    fn test_absorb_does_not_readd_url_mid_retry() {
        let mut frontier = Frontier::seeded("https://example.com");
        frontier.take_batch(1);
        frontier.requeue("https://example.com".to_string());

        // Rediscovered through another page while a retry is queued.
        frontier.absorb(links(&["https://example.com"]));
        assert_eq!(frontier.pending_len(), 1);
    }
}
