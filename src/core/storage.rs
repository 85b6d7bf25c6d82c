use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::error::PhysicsError;
use crate::Result;

/// A stable reference to a value stored in an [`Arena`].
///
/// A handle names a slot and the generation that slot had when the value was
/// inserted. Erasing the value bumps the generation, so the handle goes stale
/// instead of silently pointing at whatever reuses the slot.
pub struct Handle<T> {
    slot: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(slot: u32, generation: u32) -> Self {
        Self {
            slot,
            generation,
            _marker: PhantomData,
        }
    }

    /// Index of the slot this handle points to
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the handle was created
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would require `T: Clone`, `T: PartialEq`...
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Position of the value in the dense vector, meaningless while vacant
    index: u32,
    generation: u32,
    occupied: bool,
}

/// Dense storage with stable handles.
///
/// Values live contiguously in insertion order (modulo swap-removes), which keeps
/// constraint sweeps cache friendly and lets them run in either direction. A slot
/// table maps handles to dense indices and is patched whenever `remove` moves the
/// last value into the freed position.
pub struct Arena<T> {
    values: Vec<T>,
    /// Slot owning each dense value, parallel to `values`
    owners: Vec<u32>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates a new empty arena
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            owners: Vec::new(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Creates an empty arena with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Adds a value to the arena and returns its handle
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let index = self.values.len() as u32;
        let slot_id = match self.free.pop() {
            Some(slot_id) => {
                let slot = &mut self.slots[slot_id as usize];
                slot.index = index;
                slot.occupied = true;
                slot_id
            }
            None => {
                self.slots.push(Slot {
                    index,
                    generation: 0,
                    occupied: true,
                });
                (self.slots.len() - 1) as u32
            }
        };

        self.values.push(value);
        self.owners.push(slot_id);
        Handle::new(slot_id, self.slots[slot_id as usize].generation)
    }

    /// Returns the dense index for a live handle
    fn dense_index(&self, handle: Handle<T>) -> Option<usize> {
        self.slots
            .get(handle.slot as usize)
            .filter(|slot| slot.occupied && slot.generation == handle.generation)
            .map(|slot| slot.index as usize)
    }

    /// Returns whether the handle still refers to a live value
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.dense_index(handle).is_some()
    }

    /// Gets a reference to a value by its handle
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.dense_index(handle).map(|index| &self.values[index])
    }

    /// Gets a mutable reference to a value by its handle
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        match self.dense_index(handle) {
            Some(index) => Some(&mut self.values[index]),
            None => None,
        }
    }

    /// Gets a value by its handle, returning an error if it was erased
    pub fn try_get(&self, handle: Handle<T>) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{:?} is not live", handle)))
    }

    /// Gets a mutable reference to a value by its handle, returning an error if it was erased
    pub fn try_get_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{:?} is not live", handle)))
    }

    /// Removes a value from the arena.
    ///
    /// The last dense value is moved into the hole; its slot is updated so every
    /// other outstanding handle keeps resolving to the same logical value.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let index = self.dense_index(handle)?;

        let value = self.values.swap_remove(index);
        self.owners.swap_remove(index);
        if let Some(&moved) = self.owners.get(index) {
            self.slots[moved as usize].index = index as u32;
        }

        let slot = &mut self.slots[handle.slot as usize];
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);

        Some(value)
    }

    /// Removes a value from the arena, returning an error if it was already erased
    pub fn try_remove(&mut self, handle: Handle<T>) -> Result<T> {
        self.remove(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("{:?} is not live", handle)))
    }

    /// Returns the number of live values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every value; all outstanding handles become stale
    pub fn clear(&mut self) {
        for &slot_id in &self.owners {
            let slot = &mut self.slots[slot_id as usize];
            slot.occupied = false;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(slot_id);
        }
        self.values.clear();
        self.owners.clear();
    }

    /// Live values in dense order
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Live values in dense order, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterates over live values in dense order; reverse with `.rev()`
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Mutably iterates over live values in dense order; reverse with `.rev()`
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    /// Returns the handle of the value stored at `index` in dense order
    pub fn handle_at(&self, index: usize) -> Option<Handle<T>> {
        let slot_id = *self.owners.get(index)?;
        Some(Handle::new(slot_id, self.slots[slot_id as usize].generation))
    }

    /// Returns the handles of all live values, in dense order
    pub fn handles(&self) -> Vec<Handle<T>> {
        (0..self.values.len()).filter_map(|index| self.handle_at(index)).collect()
    }

    /// Iterates over `(handle, value)` pairs in dense order
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.owners.iter().zip(self.values.iter()).map(move |(&slot_id, value)| {
            (Handle::new(slot_id, self.slots[slot_id as usize].generation), value)
        })
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the handle was erased; that is a logic error in the caller.
    fn index(&self, handle: Handle<T>) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("dereferenced stale arena handle {:?}", handle),
        }
    }
}

impl<T> IndexMut<Handle<T>> for Arena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        match self.dense_index(handle) {
            Some(index) => &mut self.values[index],
            None => panic!("dereferenced stale arena handle {:?}", handle),
        }
    }
}

impl<'a, T> IntoIterator for &'a Arena<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Arena<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_with_handles()).finish()
    }
}
