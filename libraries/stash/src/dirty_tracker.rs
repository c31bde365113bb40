//! # DirtyTracker
//! A DirtyTracker is a wrapper around any type that adds a "dirty" flag. The flag is set whenever the value is borrowed mutably
//! and cleared once the value has been written to storage. This lets the owner know when a save is needed.

use std::ops::{Deref, DerefMut};

#[derive(Clone, Debug)]
pub struct DirtyTracker<T> {
    value: T,
    dirty: bool,
}

impl<T: Default> Default for DirtyTracker<T> {
    fn default() -> Self {
        // A freshly created value has never been written, so it starts out dirty.
        Self::fresh(T::default())
    }
}

/// Smart pointer that marks the tracker as dirty when dereferenced mutably
pub struct DirtyOnDerefMut<'a, T> {
    value: &'a mut T,
    dirty: &'a mut bool,
}

impl<T> Deref for DirtyOnDerefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value
    }
}

impl<T> DerefMut for DirtyOnDerefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        *self.dirty = true;
        self.value
    }
}

impl<T> DirtyTracker<T> {
    /// Wraps a value that matches what is in storage.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Wraps a value that storage does not know about yet.
    pub fn fresh(value: T) -> Self {
        Self { value, dirty: true }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> DirtyOnDerefMut<'_, T> {
        DirtyOnDerefMut {
            value: &mut self.value,
            dirty: &mut self.dirty,
        }
    }

    /// Swaps in a new value and marks it dirty.
    pub fn replace(&mut self, value: T) -> T {
        self.dirty = true;
        std::mem::replace(&mut self.value, value)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call after the current value was written successfully.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
