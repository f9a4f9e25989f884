//! Bounded result cache keyed by a digest of text and request options.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::AnalysisResult;

/// SHA-256 over the whitespace-normalized text and the JSON of `options`.
pub fn cache_key<T: Serialize>(text: &str, options: &T) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let options = serde_json::to_string(options).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update([0u8]);
    hasher.update(options.as_bytes());
    format!("{:x}", hasher.finalize())
}

struct Entry {
    result: AnalysisResult,
    inserted_at: Instant,
    last_used: u64,
}

/// Least-recently-used map with an optional time-to-live.
pub struct ResultCache {
    capacity: usize,
    ttl: Option<Duration>,
    entries: HashMap<String, Entry>,
    tick: u64,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: HashMap::new(),
            tick: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<AnalysisResult> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<AnalysisResult> {
        let expired = match (self.entries.get(key), self.ttl) {
            (None, _) => return None,
            (Some(e), Some(ttl)) => now.saturating_duration_since(e.inserted_at) >= ttl,
            (Some(_), None) => false,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }

        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|e| {
            e.last_used = tick;
            e.result.clone()
        })
    }

    pub fn put(&mut self, key: String, result: AnalysisResult) {
        self.put_at(key, result, Instant::now());
    }

    pub fn put_at(&mut self, key: String, result: AnalysisResult, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.tick += 1;
        self.entries.insert(
            key,
            Entry {
                result,
                inserted_at: now,
                last_used: self.tick,
            },
        );
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());
        if let Some(k) = oldest {
            self.entries.remove(&k);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
