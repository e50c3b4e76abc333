// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Generation-checked body handles
//!
//! Bodies are referenced by lightweight [`BodyHandle`] values rather than
//! pointers, so a collision callback that destroys a body cannot leave a
//! dangling reference in use later in the same step. Each slot carries a
//! generation counter that is bumped on removal; a stale handle simply
//! stops resolving.

use std::fmt;

/// Handle to a body slot with generational index support for safe references
///
/// # Examples
///
/// ```
/// use physics2d::handle::BodySet;
///
/// let mut set = BodySet::new();
/// let handle = set.insert("payload");
/// assert!(set.contains(handle));
/// set.remove(handle);
/// assert!(!set.contains(handle));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Create a handle from a raw slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        BodyHandle { index, generation }
    }

    /// The slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({}, gen: {})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generation-checked slot map holding the world's body entries
///
/// Insertion reuses freed slots; removal increments the slot's generation
/// to invalidate outstanding handles.
pub struct BodySet<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> BodySet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        BodySet {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a value, returning its handle
    pub fn insert(&mut self, value: T) -> BodyHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            BodyHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            BodyHandle::new(index, 0)
        }
    }

    /// Remove the value for a handle
    ///
    /// Increments the slot generation so outstanding copies of the handle
    /// stop resolving. Returns `None` for stale or foreign handles.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        slot.value.take()
    }

    /// Whether a handle still resolves to a live value
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Shared access to the value for a handle
    pub fn get(&self, handle: BodyHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Mutable access to the value for a handle
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Mutable access to two distinct slots at once
    ///
    /// Needed by the contact resolver, which writes impulses into both
    /// bodies of a pair. Returns `None` if either handle is stale or the
    /// handles alias the same slot.
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        if a.index == b.index {
            return None;
        }
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a.index as usize, b.index as usize, false)
        } else {
            (b.index as usize, a.index as usize, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].value.as_mut()?;
        let second = tail[0].value.as_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no live values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over live entries in slot order
    ///
    /// Slot order is stable for a given insertion sequence, which is what
    /// makes broad-phase discovery order deterministic.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|v| (BodyHandle::new(i as u32, slot.generation), v))
        })
    }

    /// Iterate mutably over live entries in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(move |v| (BodyHandle::new(i as u32, generation), v))
        })
    }

    /// Handles of all live entries, in slot order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// Remove all values and invalidate all outstanding handles
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.len = 0;
    }
}

impl<T> Default for BodySet<T> {
    fn default() -> Self {
        Self::new()
    }
}
