use std::collections::{HashMap, VecDeque};

use crate::models::filter::QueryParams;
use crate::models::sale::SalesResult;

/// Bounded least-recently-used cache of fetched pages.
///
/// Keyed by the canonical serialization of `QueryParams`, so two queries hit
/// the same entry exactly when their filters and cursor are equal.
#[derive(Debug, Clone)]
pub struct ResultCache {
    capacity: usize,
    entries: HashMap<String, SalesResult>,
    /// Keys from least to most recently used.
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn contains(&self, params: &QueryParams) -> bool {
        self.entries.contains_key(&params.cache_key())
    }

    /// Look up a page and mark it most recently used.
    pub fn get(&mut self, params: &QueryParams) -> Option<&SalesResult> {
        let key = params.cache_key();
        if self.entries.contains_key(&key) {
            self.hits += 1;
            self.touch(&key);
            self.entries.get(&key)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Insert or replace a page, evicting the least recently used one when full.
    pub fn insert(&mut self, params: &QueryParams, result: SalesResult) {
        let key = params.cache_key();
        if self.entries.insert(key.clone(), result).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Drop every cached page. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(64)
    }
}
