//! `Latest<T>`: a latest-value slot shared between asynchronous producers and
//! the planning cycle.
//!
//! Producers replace the whole value; the consumer takes an `Arc` snapshot.
//! A snapshot never changes after it is taken, so later updates cannot alter
//! answers mid-cycle.

use std::sync::Arc;

use parking_lot::RwLock;

/// Holds the most recent value of `T`, or nothing if none was ever received.
#[derive(Debug)]
pub struct Latest<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self { slot: RwLock::new(None) }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored value wholesale.
    pub fn store(&self, value: T) {
        *self.slot.write() = Some(Arc::new(value));
    }

    /// Take a snapshot of the current value.
    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.slot.read().clone()
    }

    /// Clear the slot only if it still holds `expected`.
    ///
    /// Returns `false` when a producer stored a newer value in the meantime,
    /// in which case the newer value is left untouched.
    pub fn clear_if(&self, expected: &Arc<T>) -> bool {
        let mut slot = self.slot.write();
        match slot.as_ref() {
            Some(current) if Arc::ptr_eq(current, expected) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }
}
