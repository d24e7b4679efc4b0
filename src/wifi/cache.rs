//! Last-parsed records cache
//!
//! Overwrite-on-write: the most recent `set` wins, nothing expires on its own.

use std::sync::Arc;

use parking_lot::RwLock;

use super::types::AccessPoint;

/// Shared handle; clones see the same slot
#[derive(Debug, Clone, Default)]
pub struct AccessPointCache {
    slot: Arc<RwLock<Option<Arc<[AccessPoint]>>>>,
}

impl AccessPointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached records, returning the shared copy
    pub fn set(&self, access_points: Vec<AccessPoint>) -> Arc<[AccessPoint]> {
        let shared: Arc<[AccessPoint]> = access_points.into();
        *self.slot.write() = Some(Arc::clone(&shared));
        shared
    }

    /// Fill the slot only if it is still empty.
    ///
    /// The check and the insert happen under one write lock, so a `set`
    /// that lands while `access_points` was being produced is kept.
    pub fn get_or_set(&self, access_points: Vec<AccessPoint>) -> Arc<[AccessPoint]> {
        let mut slot = self.slot.write();
        if let Some(current) = slot.as_ref() {
            return Arc::clone(current);
        }
        let shared: Arc<[AccessPoint]> = access_points.into();
        *slot = Some(Arc::clone(&shared));
        shared
    }

    pub fn get(&self) -> Option<Arc<[AccessPoint]>> {
        self.slot.read().clone()
    }

    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(mac: &str) -> AccessPoint {
        AccessPoint {
            mac: mac.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_get_invalidate() {
        let cache = AccessPointCache::new();
        assert!(cache.get().is_none());
        assert!(cache.get().is_none());

        cache.set(vec![ap("AA")]);
        assert_eq!(cache.get().unwrap().len(), 1);

        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = AccessPointCache::new();
        cache.set(vec![ap("AA"), ap("BB")]);
        cache.set(vec![ap("CC")]);

        let cached = cache.get().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].mac, "CC");
    }

    #[test]
    fn test_clones_share_state() {
        let cache = AccessPointCache::new();
        let handle = cache.clone();
        handle.set(vec![ap("AA")]);
        assert!(cache.get().is_some());
    }

    #[test]
    fn test_get_or_set_fills_empty_slot() {
        let cache = AccessPointCache::new();
        let filled = cache.get_or_set(vec![ap("AA")]);
        assert_eq!(filled[0].mac, "AA");
        assert_eq!(cache.get().unwrap()[0].mac, "AA");
    }

    #[test]
    fn test_get_or_set_keeps_existing_records() {
        let cache = AccessPointCache::new();
        cache.set(vec![ap("UPLOAD")]);

        let served = cache.get_or_set(vec![ap("SAMPLE"), ap("SAMPLE2")]);
        assert_eq!(served.len(), 1);
        assert_eq!(served[0].mac, "UPLOAD");
        assert_eq!(cache.get().unwrap()[0].mac, "UPLOAD");
    }

    #[test]
    fn test_readers_keep_old_snapshot() {
        let cache = AccessPointCache::new();
        let before = cache.set(vec![ap("AA")]);
        cache.set(vec![ap("BB")]);
        assert_eq!(before[0].mac, "AA");
    }
}
