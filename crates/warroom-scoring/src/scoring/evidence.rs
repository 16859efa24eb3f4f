//! Contract for the background evidence collaborator.
//!
//! Harvesting lives outside this crate; the engine only ever consumes
//! snippets that were already collected. Providers must degrade to an empty
//! list on any failure so grading never blocks on evidence.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::domain::EvidenceSnippet;

/// Collects supporting snippets for a source locator and a set of search
/// terms, inside a bounded time budget. Implementations must not fail past
/// this boundary: any fetch or parse problem is an empty result.
pub trait EvidenceProvider: Send + Sync {
    fn snippets(&self, locator: &str, terms: &[String]) -> Vec<EvidenceSnippet>;
}

/// Default provider: evidence harvesting disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvidenceProvider;

impl EvidenceProvider for NullEvidenceProvider {
    fn snippets(&self, _locator: &str, _terms: &[String]) -> Vec<EvidenceSnippet> {
        Vec::new()
    }
}

struct CachedEvidence {
    stored_at: Instant,
    snippets: Vec<EvidenceSnippet>,
}

/// Time-boxed snippet cache keyed by (locator, sorted terms).
///
/// Entries are replace-only and evicted lazily when a read finds them
/// expired; there is no background sweep.
pub struct EvidenceCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedEvidence>>,
}

impl EvidenceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(locator: &str, terms: &[String]) -> String {
        let mut sorted: Vec<&str> = terms.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        format!("{locator}:{}", sorted.join(":"))
    }

    pub fn get(&self, locator: &str, terms: &[String]) -> Option<Vec<EvidenceSnippet>> {
        let key = Self::cache_key(locator, terms);
        let mut entries = self.entries.lock().expect("evidence cache mutex poisoned");

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.snippets.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, locator: &str, terms: &[String], snippets: Vec<EvidenceSnippet>) {
        let key = Self::cache_key(locator, terms);
        let mut entries = self.entries.lock().expect("evidence cache mutex poisoned");
        entries.insert(
            key,
            CachedEvidence {
                stored_at: Instant::now(),
                snippets,
            },
        );
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("evidence cache mutex poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(text: &str) -> EvidenceSnippet {
        EvidenceSnippet {
            snapshot_path: "snapshots/page.html".to_string(),
            xpath: "//p[1]".to_string(),
            start_offset: 0,
            end_offset: text.len(),
            text_snippet: text.to_string(),
        }
    }

    #[test]
    fn cache_hits_within_ttl() {
        let cache = EvidenceCache::new(Duration::from_secs(3600));
        let terms = vec!["founders".to_string(), "revenue".to_string()];
        cache.set("https://example.org", &terms, vec![snippet("founded 1994")]);

        let hit = cache.get("https://example.org", &terms).expect("cache hit");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].text_snippet, "founded 1994");
    }

    #[test]
    fn term_order_does_not_change_the_key() {
        let cache = EvidenceCache::new(Duration::from_secs(3600));
        let stored = vec!["revenue".to_string(), "founders".to_string()];
        let queried = vec!["founders".to_string(), "revenue".to_string()];
        cache.set("https://example.org", &stored, vec![snippet("text")]);

        assert!(cache.get("https://example.org", &queried).is_some());
    }

    #[test]
    fn expired_entries_read_as_absent_and_are_evicted() {
        let cache = EvidenceCache::new(Duration::ZERO);
        let terms = vec!["founders".to_string()];
        cache.set("https://example.org", &terms, vec![snippet("text")]);

        assert!(cache.get("https://example.org", &terms).is_none());
        // The expired entry is gone, not just hidden.
        assert!(cache.get("https://example.org", &terms).is_none());
    }

    #[test]
    fn null_provider_returns_nothing() {
        let provider = NullEvidenceProvider;
        assert!(provider
            .snippets("https://example.org", &["founders".to_string()])
            .is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = EvidenceCache::new(Duration::from_secs(3600));
        let terms = vec!["founders".to_string()];
        cache.set("https://example.org", &terms, vec![snippet("text")]);
        cache.clear();
        assert!(cache.get("https://example.org", &terms).is_none());
    }
}
