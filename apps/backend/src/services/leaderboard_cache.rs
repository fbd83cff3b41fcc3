//! Leaderboard cache shared by every worker.
//!
//! Entries are keyed by `(league_id, epoch)`. The epoch moves forward whenever a
//! match result is stored, which makes every older entry unreachable; stale
//! entries are purged on the bump. Membership changes only touch their league
//! through [`LeaderboardCache::invalidate_league`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::leaderboard::LeaderboardEntry;

type Key = (i64, u64);

/// A computed leaderboard and the epoch it was computed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLeaderboard {
    pub epoch: u64,
    pub entries: Vec<LeaderboardEntry>,
}

/// Uses DashMap for lock-free concurrent reads and per-key mutexes so
/// concurrent misses on the same league build once.
pub struct LeaderboardCache {
    epoch: AtomicU64,
    cache: DashMap<Key, Arc<CachedLeaderboard>>,
    init_locks: DashMap<Key, Arc<Mutex<()>>>,
}

impl LeaderboardCache {
    pub fn new() -> Self {
        Self {
            epoch: AtomicU64::new(0),
            cache: DashMap::new(),
            init_locks: DashMap::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Fast path: cached leaderboard for the current epoch, if any.
    pub fn get(&self, league_id: i64) -> Option<Arc<CachedLeaderboard>> {
        let key = (league_id, self.epoch());
        self.cache.get(&key).map(|entry| entry.value().clone())
    }

    /// Cached leaderboard, or the output of `build` stored under the epoch
    /// observed before building.
    ///
    /// Double-checked: a miss takes the per-key mutex and looks again before
    /// building, so concurrent misses run `build` once.
    pub async fn get_or_build<F, Fut, E>(
        &self,
        league_id: i64,
        build: F,
    ) -> Result<Arc<CachedLeaderboard>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<LeaderboardEntry>, E>>,
    {
        let key = (league_id, self.epoch());

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.value().clone());
        }

        let lock = self
            .init_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = lock.lock().await;

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.value().clone());
        }

        let entries = build().await?;
        let value = Arc::new(CachedLeaderboard {
            epoch: key.1,
            entries,
        });
        self.cache.insert(key, value.clone());
        self.init_locks.remove(&key);

        Ok(value)
    }

    /// Start a new epoch and drop everything cached under older ones.
    pub fn bump_epoch(&self) -> u64 {
        let next = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.cache.retain(|(_, epoch), _| *epoch >= next);
        self.init_locks.retain(|(_, epoch), _| *epoch >= next);
        tracing::debug!(epoch = next, "leaderboard cache epoch bumped");
        next
    }

    /// Drop the cached leaderboard of one league.
    pub fn invalidate_league(&self, league_id: i64) {
        self.cache.retain(|(id, _), _| *id != league_id);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::new()
    }
}
