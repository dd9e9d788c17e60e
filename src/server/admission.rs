//! Connection admission control
//!
//! Bounds the number of connections processed at once. Every admitted
//! connection holds a [`ConnectionSlot`]; the slot is handed back to the
//! registry when it is released or dropped, whichever comes first.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Table of active flags, one per slot.
#[derive(Debug)]
struct SlotTable {
    active: Vec<bool>,
    in_use: usize,
}

#[derive(Debug)]
struct Registry {
    table: Mutex<SlotTable>,
    max_connections: usize,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, SlotTable> {
        // Table updates cannot panic halfway, so a poisoned table is intact.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release(&self, id: usize) {
        let mut guard = self.lock();
        let table = &mut *guard;

        match table.active.get_mut(id) {
            Some(flag) if *flag => {
                *flag = false;
                table.in_use -= 1;
                tracing::debug!(slot = id, active = table.in_use, "Connection slot released");
            }
            _ => {
                tracing::warn!(slot = id, "Release of a slot that is not active");
            }
        }
    }
}

/// Gatekeeper for concurrently active connections.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct ConnectionAdmitter {
    registry: Arc<Registry>,
}

impl ConnectionAdmitter {
    /// Creates an admitter allowing at most `max_connections` active slots.
    pub fn new(max_connections: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                table: Mutex::new(SlotTable {
                    active: vec![false; max_connections],
                    in_use: 0,
                }),
                max_connections,
            }),
        }
    }

    /// Claims the lowest free slot, or returns `None` when all are taken.
    ///
    /// Finding the slot and marking it active happen under one lock, so two
    /// callers can never be handed the same slot.
    pub fn try_admit(&self) -> Option<ConnectionSlot> {
        let mut table = self.registry.lock();

        let id = table.active.iter().position(|active| !active)?;
        table.active[id] = true;
        table.in_use += 1;

        Some(ConnectionSlot {
            id,
            registry: Arc::clone(&self.registry),
        })
    }

    /// Hands the slot back to the registry.
    ///
    /// Same as dropping the slot.
    pub fn release(&self, slot: ConnectionSlot) {
        debug_assert!(Arc::ptr_eq(&self.registry, &slot.registry));
        drop(slot);
    }

    /// Number of slots currently held.
    pub fn active_count(&self) -> usize {
        self.registry.lock().in_use
    }

    /// Configured upper bound on active slots.
    pub fn max_connections(&self) -> usize {
        self.registry.max_connections
    }
}

/// One admitted connection's accounting unit.
///
/// Not `Clone`: exactly one owner exists, and the slot is cleared exactly
/// once when that owner lets go of it.
pub struct ConnectionSlot {
    id: usize,
    registry: Arc<Registry>,
}

impl ConnectionSlot {
    /// Stable identifier of this slot, in `0..max_connections`.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether the registry still records this slot as held.
    pub fn is_active(&self) -> bool {
        self.registry
            .lock()
            .active
            .get(self.id)
            .copied()
            .unwrap_or(false)
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl fmt::Debug for ConnectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSlot").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_free_slot_is_reused() {
        let admitter = ConnectionAdmitter::new(3);

        let a = admitter.try_admit().unwrap();
        let b = admitter.try_admit().unwrap();
        let c = admitter.try_admit().unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (0, 1, 2));

        drop(b);
        let d = admitter.try_admit().unwrap();
        assert_eq!(d.id(), 1);
        assert_eq!(admitter.active_count(), 3);
    }

    #[test]
    fn zero_capacity_admits_nothing() {
        let admitter = ConnectionAdmitter::new(0);
        assert!(admitter.try_admit().is_none());
        assert_eq!(admitter.active_count(), 0);
    }
}
