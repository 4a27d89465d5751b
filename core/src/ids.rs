//! Local identity allocation for created posts.
//!
//! The placeholder service hands back the same id for every create and keeps
//! nothing, so created posts are identified locally instead. Ids derive from
//! the wall clock in milliseconds, never repeat within one allocator, and skip
//! any value the caller reports as taken.

use std::sync::atomic::{AtomicI64, Ordering};

/// Allocator of client-side post ids, safe to share between tasks.
#[derive(Debug, Default)]
pub struct LocalIds {
    last: AtomicI64,
}

impl LocalIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id from the current wall clock.
    pub fn next(&self, taken: impl Fn(i64) -> bool) -> i64 {
        self.next_at(chrono::Utc::now().timestamp_millis(), taken)
    }

    /// Allocate the smallest id `>= now_millis` that is above every id handed
    /// out so far and for which `taken` is false.
    pub fn next_at(&self, now_millis: i64, taken: impl Fn(i64) -> bool) -> i64 {
        let mut allocated = now_millis;
        // fetch_update retries the closure on contention, so `allocated`
        // always reflects the value that was actually stored. The closure
        // never returns None, so the update is never rejected.
        self.last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                let mut id = now_millis.max(last.saturating_add(1));
                while taken(id) {
                    id += 1;
                }
                allocated = id;
                Some(id)
            })
            .unwrap_or_else(|last| last);
        allocated
    }
}
