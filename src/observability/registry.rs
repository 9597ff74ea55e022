//! Per-method invocation counters.
//!
//! One `AtomicU64` per distinct method name, created lazily on first use.
//! Writers only take a shard lock long enough to find or insert a key; the
//! increment itself is atomic. There is no removal, so the map grows with
//! the number of distinct method names seen.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrency-safe mapping from method name to call count.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    counters: DashMap<String, AtomicU64>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one call to `method`.
    pub fn increment(&self, method: &str) {
        // Fast path avoids allocating the key for methods already seen.
        if let Some(counter) = self.counters.get(method) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.counters
            .entry(method.to_owned())
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for `method`, zero if never seen.
    pub fn get(&self, method: &str) -> u64 {
        self.counters
            .get(method)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Point-in-time copy of all counters, sorted by method name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_empty() {
        let registry = MethodRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
        assert_eq!(registry.get("eth_blockNumber"), 0);
    }

    #[test]
    fn test_increment_and_snapshot() {
        let registry = MethodRegistry::new();
        registry.increment("eth_blockNumber");
        registry.increment("eth_blockNumber");
        registry.increment("web3_clientVersion");

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["eth_blockNumber"], 2);
        assert_eq!(snapshot["web3_clientVersion"], 1);

        // Snapshot is a copy.
        registry.increment("web3_clientVersion");
        assert_eq!(snapshot["web3_clientVersion"], 1);
        assert_eq!(registry.get("web3_clientVersion"), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let registry = Arc::new(MethodRegistry::new());
        let threads = 8;
        let per_thread = 1_000;

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        registry.increment("eth_call");
                        registry.increment(if i % 2 == 0 { "even" } else { "odd" });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get("eth_call"), threads * per_thread);
        assert_eq!(registry.get("even"), threads / 2 * per_thread);
        assert_eq!(registry.get("odd"), threads / 2 * per_thread);
    }
}
