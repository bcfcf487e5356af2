//! A generational [`Arena`] for storing values behind stable handles.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;

/// A generational index into an [`Arena`].
///
/// The generation is bumped every time a slot is freed, so an index that outlives
/// its value never resolves to a different value that reuses the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    slot: u32,
    generation: u32,
}

impl Index {
    /// Creates an index from its raw parts.
    #[inline]
    pub const fn from_raw_parts(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the slot this index points to.
    #[inline]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the generation of the slot at the time the index was created.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32 },
}

/// A storage of values addressed by generational [`Index`]es.
///
/// Freed slots are stored in a min-heap, and reused such that the lowest available slots are allocated first.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    /// A min-heap of free slots. The lowest free slots are allocated first.
    free_slots: BinaryHeap<Reverse<u32>>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates a new empty [`Arena`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_slots: BinaryHeap::new(),
            len: 0,
        }
    }

    /// Inserts a value and returns the index it can be accessed with.
    ///
    /// If there are free slots available, the lowest free slot is reused.
    pub fn insert(&mut self, value: T) -> Index {
        self.len += 1;

        if let Some(Reverse(slot)) = self.free_slots.pop() {
            let entry = &mut self.entries[slot as usize];
            let generation = match &*entry {
                Entry::Vacant { generation } => *generation,
                // Free slots are always vacant.
                Entry::Occupied { .. } => unreachable!("free slot {slot} is occupied"),
            };
            *entry = Entry::Occupied { generation, value };
            Index::from_raw_parts(slot, generation)
        } else {
            let slot = self.entries.len() as u32;
            self.entries.push(Entry::Occupied {
                generation: 0,
                value,
            });
            Index::from_raw_parts(slot, 0)
        }
    }

    /// Removes the value at the given index and returns it.
    ///
    /// Returns `None` if the index is stale or was never allocated.
    pub fn remove(&mut self, index: Index) -> Option<T> {
        let entry = self.entries.get_mut(index.slot as usize)?;
        let generation = match &*entry {
            Entry::Occupied { generation, .. } if *generation == index.generation => *generation,
            _ => return None,
        };

        let next = Entry::Vacant {
            generation: generation.wrapping_add(1),
        };
        let Entry::Occupied { value, .. } = core::mem::replace(entry, next) else {
            unreachable!("entry was checked to be occupied")
        };
        self.free_slots.push(Reverse(index.slot));
        self.len -= 1;
        Some(value)
    }

    /// Returns a reference to the value at the given index, or `None` if the index is stale.
    #[inline]
    pub fn get(&self, index: Index) -> Option<&T> {
        match self.entries.get(index.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at the given index, or `None` if the index is stale.
    #[inline]
    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        match self.entries.get_mut(index.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Returns `true` if the index points to a live value.
    #[inline]
    pub fn contains(&self, index: Index) -> bool {
        self.get(index).is_some()
    }

    /// Returns the number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over the indices and values of all live entries.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| match entry {
                Entry::Occupied { generation, value } => {
                    Some((Index::from_raw_parts(slot as u32, *generation), value))
                }
                Entry::Vacant { .. } => None,
            })
    }
}
