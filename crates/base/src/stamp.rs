use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

/// Shared, monotonically increasing frame counter.
///
/// Clones share the same counter. The first value handed out is 1, so 0 can
/// be used as "nothing seen yet".
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    value: Arc<AtomicU64>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence number.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A value stamped with the sequence number of the frame it was derived from.
#[derive(Clone, Debug, PartialEq)]
pub struct Stamped<T> {
    pub seq: u64,
    pub inner: T,
}

impl<T> Stamped<T> {
    pub fn new(seq: u64, inner: T) -> Self {
        Self { seq, inner }
    }
}

/// Single-slot "latest result" cell.
///
/// Producers on any thread `publish` stamped results; a result is stored only
/// if its sequence number is newer than the one already held, so a slow frame
/// finishing late can never replace the result of a later frame. Readers
/// `get` the newest value without consuming it.
pub struct Latest<T> {
    slot: Arc<Mutex<Option<Stamped<T>>>>,
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` if it is newer than the current one. Returns whether it was stored.
    pub fn publish(&self, value: Stamped<T>) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(current) if current.seq >= value.seq => false,
            _ => {
                *slot = Some(value);
                true
            }
        }
    }

    /// Sequence number of the stored value, 0 if empty.
    pub fn seq(&self) -> u64 {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map_or(0, |v| v.seq)
    }
}

impl<T: Clone> Latest<T> {
    pub fn get(&self) -> Option<Stamped<T>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.clone()
    }

    /// The stored value, but only if it is newer than `seen`.
    pub fn get_newer(&self, seen: u64) -> Option<Stamped<T>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().filter(|v| v.seq > seen).cloned()
    }
}
