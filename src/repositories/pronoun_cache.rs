//! In-process bidirectional pronoun cache.
//!
//! Pronoun rows are tiny, append-only, and shared by every user row, so the
//! whole table is mirrored in memory: id -> pair for display, pair -> id for
//! writes. Both directions live under a single lock so a reader can never
//! observe one direction updated without the other.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::Pronouns;

/// Bidirectional map between pronoun surrogate ids and pronoun pairs.
///
/// Shared behind `Arc` between the reader and writer repositories. Writes
/// only ever add entries; pairs are never mutated or removed while the
/// process is running.
#[derive(Debug, Default)]
pub struct PronounCache {
    inner: RwLock<CacheMaps>,
}

#[derive(Debug, Default)]
struct CacheMaps {
    by_id: HashMap<i32, Pronouns>,
    by_pair: HashMap<Pronouns, i32>,
}

impl PronounCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the pair for a surrogate id.
    pub fn get(&self, id: i32) -> Option<Pronouns> {
        let maps = self.inner.read().expect("pronoun cache lock poisoned");
        maps.by_id.get(&id).cloned()
    }

    /// Looks up the surrogate id for a pair.
    pub fn get_id(&self, pronouns: &Pronouns) -> Option<i32> {
        let maps = self.inner.read().expect("pronoun cache lock poisoned");
        maps.by_pair.get(pronouns).copied()
    }

    /// Records a pair under its id, updating both directions atomically.
    pub fn insert(&self, id: i32, pronouns: Pronouns) {
        let mut maps = self.inner.write().expect("pronoun cache lock poisoned");
        maps.by_id.insert(id, pronouns.clone());
        maps.by_pair.insert(pronouns, id);
    }

    /// Bulk-loads rows, typically the whole table at startup.
    pub fn load(&self, rows: impl IntoIterator<Item = (i32, Pronouns)>) {
        let mut maps = self.inner.write().expect("pronoun cache lock poisoned");
        for (id, pronouns) in rows {
            maps.by_id.insert(id, pronouns.clone());
            maps.by_pair.insert(pronouns, id);
        }
    }

    pub fn len(&self) -> usize {
        let maps = self.inner.read().expect("pronoun cache lock poisoned");
        maps.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_on_empty_cache() {
        let cache = PronounCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get_id(&Pronouns::new("she", "her")), None);
    }

    #[test]
    fn insert_populates_both_directions() {
        let cache = PronounCache::new();
        cache.insert(7, Pronouns::new("they", "them"));

        assert_eq!(cache.get(7), Some(Pronouns::new("they", "them")));
        assert_eq!(cache.get_id(&Pronouns::new("they", "them")), Some(7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn load_bulk_populates_cache() {
        let cache = PronounCache::new();
        cache.load([
            (1, Pronouns::new("he", "him")),
            (2, Pronouns::new("she", "her")),
            (3, Pronouns::new("they", "them")),
        ]);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(2), Some(Pronouns::new("she", "her")));
        assert_eq!(cache.get_id(&Pronouns::new("he", "him")), Some(1));
    }

    #[test]
    fn reinsert_same_id_keeps_directions_consistent() {
        let cache = PronounCache::new();
        let pair = Pronouns::new("ze", "zir");
        cache.insert(4, pair.clone());
        cache.insert(4, pair.clone());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_id(&pair), Some(4));
    }

    #[test]
    fn concurrent_readers_and_writers() {
        use std::sync::Arc;

        let cache = Arc::new(PronounCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                let pair = Pronouns::new(format!("subj{i}"), format!("obj{i}"));
                cache.insert(i, pair.clone());
                assert_eq!(cache.get_id(&pair), Some(i));
                assert_eq!(cache.get(i), Some(pair));
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}
