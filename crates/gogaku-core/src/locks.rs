//! Per-(learner, item) update serialization.
//!
//! Two concurrent answer submissions for the same record (duplicate
//! network retries, double taps) race on read-modify-write and silently
//! drop one update. Every progress mutation must run under the key's
//! lock; this is a correctness requirement, not an optimization.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::ItemFamily;

type LockKey = (String, ItemFamily, String);

#[derive(Default)]
pub struct UpdateLocks {
    inner: Mutex<HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl UpdateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock guarding all progress mutations for one (learner, item)
    /// pair. The returned mutex is shared by every caller asking for
    /// the same key.
    pub fn key_lock(
        &self,
        user_id: &str,
        family: ItemFamily,
        item_id: &str,
    ) -> Arc<tokio::sync::Mutex<()>> {
        let key = (user_id.to_string(), family, item_id.to_string());
        let mut map = self.inner.lock();
        Arc::clone(map.entry(key).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_yields_same_mutex() {
        let locks = UpdateLocks::new();
        let a = locks.key_lock("u1", ItemFamily::Words, "w1");
        let b = locks.key_lock("u1", ItemFamily::Words, "w1");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_keys_yield_distinct_mutexes() {
        let locks = UpdateLocks::new();
        let a = locks.key_lock("u1", ItemFamily::Words, "w1");
        let b = locks.key_lock("u1", ItemFamily::Questions, "w1");
        let c = locks.key_lock("u2", ItemFamily::Words, "w1");
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
