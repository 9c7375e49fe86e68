//! Short-lived result cache keyed by query.

use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt::Debug,
    time::{Duration, Instant},
};

use crate::model::WeatherRecord;

pub const DEFAULT_TTL: Duration = Duration::from_secs(20);

pub trait ResultCache: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<WeatherRecord>;
    fn set(&self, key: String, record: WeatherRecord, ttl: Duration);
}

/// In-process cache. Expired entries are dropped on lookup and swept on
/// every insert.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, WeatherRecord)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Option<WeatherRecord> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((expires_at, record)) if Instant::now() < *expires_at => Some(record.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: String, record: WeatherRecord, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, (expires_at, _)| *expires_at > now);
        entries.insert(key, (now + ttl, record));
    }
}
