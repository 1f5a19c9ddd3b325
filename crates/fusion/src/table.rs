//! Keyed container with one lock for the map and one lock per record.
//!
//! The structural lock guards only the map topology and is held for a lookup
//! or a link/unlink, never while waiting for a record lock. Record payloads
//! are reached through a [`Cursor`], which owns the record's lock for as
//! long as it lives. Advancing a cursor releases the current record before
//! the structural lock is taken again, so a long-running visit of one record
//! blocks neither the map nor any other record.

use std::collections::BTreeMap;
use std::ops::{Bound, Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

struct Slot<V> {
    value: V,
    /// Set under the record lock when the slot is unlinked from the map.
    /// Anyone who locked a detached slot must drop it and look again.
    detached: bool,
}

type SlotRef<V> = Arc<Mutex<Slot<V>>>;
type SlotGuard<V> = ArcMutexGuard<RawMutex, Slot<V>>;

pub struct Table<V> {
    slots: Mutex<BTreeMap<u64, SlotRef<V>>>,
}

/// Exclusive access to one record, positioned in key order.
pub struct Cursor<'t, V> {
    table: &'t Table<V>,
    key: u64,
    guard: SlotGuard<V>,
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Links `value` under `key` unless the key is taken.
    ///
    /// Returns a cursor on the record under `key` plus `None` if `value` was
    /// inserted, or `Some(value)` handed back when an entry already existed,
    /// so the caller can merge it into the existing record.
    pub fn insert(&self, key: u64, value: V) -> (Cursor<'_, V>, Option<V>) {
        loop {
            let existing = {
                let mut slots = self.slots.lock();
                match slots.get(&key) {
                    Some(slot) => Arc::clone(slot),
                    None => {
                        let slot = Arc::new(Mutex::new(Slot {
                            value,
                            detached: false,
                        }));
                        // Not yet visible to anyone, locking cannot block.
                        let guard = slot.lock_arc();
                        slots.insert(key, slot);
                        return (Cursor::new(self, key, guard), None);
                    }
                }
            };
            let guard = existing.lock_arc();
            if !guard.detached {
                return (Cursor::new(self, key, guard), Some(value));
            }
        }
    }

    /// Unlinks the record under `key`, waiting for whoever holds it.
    pub fn erase(&self, key: u64) -> bool {
        let removed = self.slots.lock().remove(&key);
        match removed {
            Some(slot) => {
                slot.lock().detached = true;
                true
            }
            None => false,
        }
    }

    /// Locks the record under `key`, if any.
    pub fn get(&self, key: u64) -> Option<Cursor<'_, V>> {
        loop {
            let slot = Arc::clone(self.slots.lock().get(&key)?);
            let guard = slot.lock_arc();
            if !guard.detached {
                return Some(Cursor::new(self, key, guard));
            }
        }
    }

    /// Cursor on the record with the lowest key.
    pub fn begin(&self) -> Option<Cursor<'_, V>> {
        self.seek(Bound::Unbounded)
    }

    fn seek(&self, from: Bound<u64>) -> Option<Cursor<'_, V>> {
        let mut from = from;
        loop {
            let (key, slot) = {
                let slots = self.slots.lock();
                let (key, slot) = slots.range((from, Bound::Unbounded)).next()?;
                (*key, Arc::clone(slot))
            };
            let guard = slot.lock_arc();
            if !guard.detached {
                return Some(Cursor::new(self, key, guard));
            }
            from = Bound::Excluded(key);
        }
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, V> Cursor<'t, V> {
    fn new(table: &'t Table<V>, key: u64, guard: SlotGuard<V>) -> Self {
        Self { table, key, guard }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    /// Releases this record and moves to the next key.
    pub fn advance(self) -> Option<Cursor<'t, V>> {
        let Cursor { table, key, guard } = self;
        drop(guard);
        table.seek(Bound::Excluded(key))
    }

    /// Unlinks this record, then moves to the next key.
    pub fn erase(self) -> Option<Cursor<'t, V>> {
        let Cursor {
            table,
            key,
            mut guard,
        } = self;
        // Holding the record lock while unlinking is fine: nobody waits for
        // a record lock with the structural lock held.
        let removed = {
            let mut slots = table.slots.lock();
            match slots.get(&key) {
                Some(slot) if Arc::ptr_eq(slot, ArcMutexGuard::mutex(&guard)) => slots.remove(&key),
                _ => None,
            }
        };
        guard.detached = true;
        drop(guard);
        drop(removed);
        table.seek(Bound::Excluded(key))
    }
}

impl<V> Deref for Cursor<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard.value
    }
}

impl<V> DerefMut for Cursor<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard.value
    }
}
