//! In-memory cache of resolved latest versions
//!
//! Entries are keyed by registry and normalized package name and expire
//! after a configurable TTL. An entry is never mutated; a fresh lookup
//! replaces it wholesale.

use crate::domain::{RegistryKind, Version};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// Default time-to-live for cached versions (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A resolved version and when it was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Latest version reported by the registry
    pub resolved_version: Version,
    /// When the registry was asked
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Returns true if the entry is younger than `ttl` at `now`
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

type CacheKey = (RegistryKind, String);

/// Shared TTL cache of latest versions
#[derive(Debug)]
pub struct VersionCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, Arc<CacheEntry>>>,
}

impl VersionCache {
    /// Create an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(kind: RegistryKind, name: &str) -> CacheKey {
        (kind, kind.normalize_name(name))
    }

    /// Returns the entry for a package if it has not expired
    pub fn get_entry(&self, kind: RegistryKind, name: &str) -> Option<Arc<CacheEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&Self::key(kind, name))
            .filter(|entry| entry.is_fresh(self.ttl, Instant::now()))
            .cloned()
    }

    /// Returns the cached version for a package if it has not expired
    pub fn get(&self, kind: RegistryKind, name: &str) -> Option<Version> {
        self.get_entry(kind, name)
            .map(|entry| entry.resolved_version.clone())
    }

    /// Store a freshly fetched version, replacing any previous entry
    pub fn insert(&self, kind: RegistryKind, name: &str, version: Version) {
        let entry = Arc::new(CacheEntry {
            resolved_version: version,
            fetched_at: Instant::now(),
        });
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(Self::key(kind, name), entry);
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.is_fresh(self.ttl, now));
    }

    /// Returns the number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for VersionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_fresh_entry() {
        let cache = VersionCache::new(Duration::from_secs(60));
        cache.insert(RegistryKind::Pip, "requests", v("2.32.3"));

        assert_eq!(cache.get(RegistryKind::Pip, "requests"), Some(v("2.32.3")));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = VersionCache::new(Duration::from_secs(60));
        cache.insert(RegistryKind::Npm, "react", v("19.1.0"));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(RegistryKind::Npm, "react").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(RegistryKind::Npm, "react").is_none());
        assert_eq!(cache.len(), 1);

        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_npm_keys_are_case_insensitive() {
        let cache = VersionCache::default();
        cache.insert(RegistryKind::Npm, "React", v("19.1.0"));
        assert!(cache.get(RegistryKind::Npm, "react").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pip_keys_are_case_sensitive() {
        let cache = VersionCache::default();
        cache.insert(RegistryKind::Pip, "Django", v("5.0"));
        assert!(cache.get(RegistryKind::Pip, "Django").is_some());
        assert!(cache.get(RegistryKind::Pip, "django").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_registries_do_not_share_entries() {
        let cache = VersionCache::default();
        cache.insert(RegistryKind::Pip, "six", v("1.16.0"));
        assert!(cache.get(RegistryKind::Npm, "six").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_replaces_entry() {
        let cache = VersionCache::new(Duration::from_secs(10));
        cache.insert(RegistryKind::Pip, "rich", v("13.0.0"));
        let first = cache.get_entry(RegistryKind::Pip, "rich").unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        cache.insert(RegistryKind::Pip, "rich", v("13.7.1"));
        let second = cache.get_entry(RegistryKind::Pip, "rich").unwrap();

        assert_eq!(first.resolved_version, v("13.0.0"));
        assert_eq!(second.resolved_version, v("13.7.1"));
        assert!(second.fetched_at > first.fetched_at);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_hits() {
        let cache = VersionCache::new(Duration::ZERO);
        cache.insert(RegistryKind::Pip, "rich", v("13.0.0"));
        assert!(cache.get(RegistryKind::Pip, "rich").is_none());
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(VersionCache::default().ttl(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = VersionCache::default();
        cache.insert(RegistryKind::Pip, "rich", v("13.0.0"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
