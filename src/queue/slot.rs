//! Generation-checked slot storage.
//!
//! Both the queue nodes and the scheduler's timers live in a `Slots` arena.
//! A `SlotKey` stays valid until its value is removed; after that the slot's
//! generation moves on and the old key no longer resolves, even if the slot
//! is handed out again.

use std::fmt;

/// Index plus generation of an occupied slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    index: usize,
    generation: u32,
}

impl SlotKey {
    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

enum Entry<T> {
    Occupied { value: T, generation: u32 },
    Vacant { next_free: Option<usize>, generation: u32 },
}

// Slots is based on Vec with an intrusive free list, It easy to add it and find it.
pub(crate) struct Slots<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Slots::with_capacity(0)
    }
}

impl<T> Slots<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Slots {
            entries: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn insert(&mut self, value: T) -> SlotKey {
        self.len += 1;

        if let Some(index) = self.free_head {
            if let Entry::Vacant {
                next_free,
                generation,
            } = self.entries[index]
            {
                self.free_head = next_free;
                self.entries[index] = Entry::Occupied { value, generation };
                return SlotKey { index, generation };
            }
        }

        let index = self.entries.len();
        self.entries.push(Entry::Occupied {
            value,
            generation: 0,
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, key: SlotKey) -> Option<T> {
        if !self.contains(key) {
            return None;
        }

        self.remove_at(key.index)
    }

    /// Removes whatever occupies `index`, regardless of generation.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        let generation = match self.entries.get(index)? {
            Entry::Occupied { generation, .. } => *generation,
            Entry::Vacant { .. } => return None,
        };

        let vacant = Entry::Vacant {
            next_free: self.free_head,
            generation: generation.wrapping_add(1),
        };

        match std::mem::replace(&mut self.entries[index], vacant) {
            Entry::Occupied { value, .. } => {
                self.free_head = Some(index);
                self.len -= 1;
                Some(value)
            }
            // Checked above.
            Entry::Vacant { .. } => None,
        }
    }

    pub(crate) fn contains(&self, key: SlotKey) -> bool {
        matches!(
            self.entries.get(key.index),
            Some(Entry::Occupied { generation, .. }) if *generation == key.generation
        )
    }

    pub(crate) fn get(&self, key: SlotKey) -> Option<&T> {
        match self.entries.get(key.index)? {
            Entry::Occupied { value, generation } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        match self.entries.get_mut(key.index)? {
            Entry::Occupied { value, generation } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_at(&self, index: usize) -> Option<&T> {
        match self.entries.get(index)? {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.entries.get_mut(index)? {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    /// Key of the value currently stored at `index`.
    pub(crate) fn key_at(&self, index: usize) -> Option<SlotKey> {
        match self.entries.get(index)? {
            Entry::Occupied { generation, .. } => Some(SlotKey {
                index,
                generation: *generation,
            }),
            Entry::Vacant { .. } => None,
        }
    }

    /// Empties every slot. Outstanding keys are invalidated, not recycled.
    pub(crate) fn clear(&mut self) {
        for index in 0..self.entries.len() {
            self.remove_at(index);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Occupied { value, generation } => Some((
                    SlotKey {
                        index,
                        generation: *generation,
                    },
                    value,
                )),
                Entry::Vacant { .. } => None,
            })
    }
}
