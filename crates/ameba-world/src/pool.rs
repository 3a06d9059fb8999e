//! Bounded pool over a [`SlotMap`] with a reset contract.
//!
//! A [`Pool`] holds at most `capacity` live values. [`Pool::acquire`]
//! reuses a previously released value when one is spare (or builds a
//! default one) and calls its [`Resettable::reset`] synchronously, so new
//! and recycled entities go through exactly the same initialization path.
//! [`Pool::release`] removes the value from the slot map, which
//! invalidates every key issued for it, and keeps the value for reuse.

use slotmap::{Key, SlotMap};

use ameba_types::Vec2;
use tracing::debug;

use crate::error::WorldError;

/// Where an acquired entity should appear.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Spawn position.
    pub position: Vec2,
    /// Spawn heading in radians.
    pub rotation: f64,
}

impl Placement {
    /// Placement at `position` with zero rotation.
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }
}

/// The reset contract invoked on every acquire.
///
/// `Seed` carries whatever the entity needs to fully reinitialize its
/// mutable state, fresh or inherited.
pub trait Resettable<Seed> {
    /// Reinitialize every mutable field from `seed` at `placement`.
    fn reset(&mut self, seed: Seed, placement: Placement);
}

/// A bounded arena of `T` addressed by typed slotmap keys `K`.
#[derive(Debug)]
pub struct Pool<T, K: Key> {
    name: &'static str,
    slots: SlotMap<K, T>,
    spare: Vec<T>,
    capacity: usize,
}

impl<T: Default, K: Key> Pool<T, K> {
    /// Create an empty pool that will never hold more than `capacity` live values.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            slots: SlotMap::with_capacity_and_key(capacity),
            spare: Vec::new(),
            capacity,
        }
    }

    /// Acquire a slot and run the reset contract on it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PoolExhausted`] when every slot is live.
    pub fn acquire<S>(&mut self, seed: S, placement: Placement) -> Result<K, WorldError>
    where
        T: Resettable<S>,
    {
        if self.is_full() {
            debug!(pool = self.name, capacity = self.capacity, "Pool exhausted");
            return Err(WorldError::PoolExhausted {
                pool: self.name,
                capacity: self.capacity,
            });
        }
        let mut value = self.spare.pop().unwrap_or_default();
        value.reset(seed, placement);
        Ok(self.slots.insert(value))
    }
}

impl<T, K: Key> Pool<T, K> {
    /// Release a live slot back to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::StaleHandle`] if the key no longer names a
    /// live slot. Releasing twice is therefore detected.
    pub fn release(&mut self, key: K) -> Result<(), WorldError> {
        let value = self.slots.remove(key).ok_or(WorldError::StaleHandle {
            pool: self.name,
            key: key.data(),
        })?;
        self.spare.push(value);
        Ok(())
    }

    /// Whether the key names a live slot.
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    /// Borrow the value behind a live key.
    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key)
    }

    /// Mutably borrow the value behind a live key.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    /// Mutably borrow two distinct live values at once.
    ///
    /// Returns `None` if either key is stale or both name the same slot.
    pub fn get_pair_mut(&mut self, a: K, b: K) -> Option<(&mut T, &mut T)> {
        self.slots
            .get_disjoint_mut([a, b])
            .map(|[first, second]| (first, second))
    }

    /// Keys of every live slot, in slot order.
    pub fn handles(&self) -> Vec<K> {
        self.slots.keys().collect()
    }

    /// Iterate over live slots.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.slots.iter()
    }

    /// Number of live slots.
    pub fn active_count(&self) -> usize {
        self.slots.len()
    }

    /// Maximum number of live slots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no slot can be acquired right now.
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }
}
