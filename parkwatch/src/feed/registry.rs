//! Subscriber registries with snapshot dispatch.
//!
//! Handlers may unsubscribe themselves or their peers while a dispatch is in
//! flight; iteration runs over a snapshot taken before the first call, so a
//! mid-dispatch removal never skips or double-invokes a peer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned by `add`. Calling `unsubscribe` removes the handler; the
/// call is idempotent and safe from inside the handler itself.
#[derive(Clone)]
pub struct Subscription {
    remove: Arc<dyn Fn() + Send + Sync>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        (self.remove)();
    }
}

pub struct Registry<H: ?Sized> {
    entries: Arc<Mutex<Vec<(u64, Arc<H>)>>>,
    next_id: AtomicU64,
}

impl<H: ?Sized + Send + Sync + 'static> Registry<H> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add(&self, handler: Arc<H>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().unwrap().push((id, handler));
        let entries = Arc::clone(&self.entries);
        Subscription {
            remove: Arc::new(move || {
                entries.lock().unwrap().retain(|(eid, _)| *eid != id);
            }),
        }
    }

    /// Copy of the current handler set, in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<H>> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: ?Sized + Send + Sync + 'static> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}
