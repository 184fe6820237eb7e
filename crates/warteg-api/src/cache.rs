//! # Query Cache
//!
//! Read-through cache shared by every screen, keyed by tag + request.
//!
//! ## Invalidation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  read starts ─► generation(Produk) = 3 ─► GET /produk ... in flight    │
//! │                                                     │                   │
//! │  write ok ────► invalidate([Produk, Dashboard])     │                   │
//! │                   • drop Produk + Dashboard entries  │                   │
//! │                   • generation(Produk) = 4           │                   │
//! │                   • broadcast to subscribers         │                   │
//! │                                                     ▼                   │
//! │  read ends ───► insert_if_current(.., seen = 3) → rejected (now 4)     │
//! │                                                                         │
//! │  A read that raced a write never puts pre-write data back.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;

use crate::endpoint::CacheTag;

const EVENT_CAPACITY: usize = 64;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tag: CacheTag,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(tag: CacheTag, path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        CacheKey {
            tag,
            path: path.into(),
            query,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, Value>,
    generations: HashMap<CacheTag, u64>,
}

/// The process-wide read cache.
#[derive(Debug)]
pub struct QueryCache {
    state: Mutex<CacheState>,
    events: broadcast::Sender<CacheTag>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        QueryCache {
            state: Mutex::new(CacheState::default()),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Entries are plain values; a panic mid-update cannot leave them torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.lock().entries.get(key).cloned()
    }

    /// Current generation of a tag. Bumped by every invalidation.
    pub fn generation(&self, tag: CacheTag) -> u64 {
        self.lock().generations.get(&tag).copied().unwrap_or(0)
    }

    /// Stores a read result unless its tag was invalidated since `seen`.
    ///
    /// Returns whether the value was stored.
    pub fn insert_if_current(&self, key: CacheKey, value: Value, seen: u64) -> bool {
        let mut state = self.lock();
        let current = state.generations.get(&key.tag).copied().unwrap_or(0);
        if current != seen {
            debug!(tag = %key.tag, seen, current, "Discarding read that raced an invalidation");
            return false;
        }
        state.entries.insert(key, value);
        true
    }

    /// Drops every entry of `tags` and notifies subscribers.
    pub fn invalidate(&self, tags: &[CacheTag]) {
        {
            let mut state = self.lock();
            state.entries.retain(|key, _| !tags.contains(&key.tag));
            for tag in tags {
                *state.generations.entry(*tag).or_insert(0) += 1;
            }
        }
        for tag in tags {
            debug!(tag = %tag, "Cache invalidated");
            // No subscribers is fine.
            let _ = self.events.send(*tag);
        }
    }

    /// Receiver of invalidated tags.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheTag> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
