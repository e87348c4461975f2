//! Priority queue ordered by a caller-supplied comparator.
//!
//! # PriorityQueue
//!
//! The queue owns its elements in a slot arena and keeps an implicit binary
//! heap of arena indices on top of it:
//!
//! 1. `insert` hands back a `NodeKey`, which can later remove that element
//! from anywhere in the heap.
//! 2. The comparator decides priority. `Ordering::Less` means the left
//! element comes out first, so a plain `a.cmp(b)` gives a min-queue.
//! 3. Elements that compare equal come out in insertion order.
//! 4. The root is the true highest-priority element after every
//! `insert`, `pop` and `remove`. Only `get_mut` can break the order;
//! call `reorder` after mutating priority fields through it.

pub(crate) mod slot;

use crate::prelude::*;

use slot::{SlotKey, Slots};

use std::fmt;
use std::marker::PhantomData;

/// Comparator used by queues built without a closure type.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Handle of one element inside a `PriorityQueue`.
///
/// A key is only meaningful for the queue that produced it. It goes stale
/// once the element leaves the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(SlotKey);

struct Node<T> {
    item: T,
    // Position of this node in `PriorityQueue::heap`.
    position: usize,
    seq: u64,
}

/// Priority queue with keyed removal.
pub struct PriorityQueue<T, C = Comparator<T>> {
    nodes: Slots<Node<T>>,
    heap: Vec<usize>,
    compare: C,
    next_seq: u64,
}

/// Builds a `PriorityQueue`, failing if no comparator was bound.
pub struct PriorityQueueBuilder<T, C = Comparator<T>> {
    compare: Option<C>,
    capacity: usize,
    _marker: PhantomData<fn(&T)>,
}

impl<T, C> Default for PriorityQueueBuilder<T, C> {
    fn default() -> Self {
        PriorityQueueBuilder {
            compare: None,
            capacity: 0,
            _marker: PhantomData,
        }
    }
}

impl<T, C> PriorityQueueBuilder<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Bind the three-way comparator that defines priority.
    pub fn comparator(mut self, compare: C) -> Self {
        self.compare = Some(compare);
        self
    }

    /// Preallocate room for `capacity` elements.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the queue.
    pub fn build(self) -> Result<PriorityQueue<T, C>, QueueError> {
        let compare = self.compare.ok_or(QueueError::MissingComparator)?;
        Ok(PriorityQueue::with_capacity(self.capacity, compare))
    }
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// New an empty queue ordered by `compare`.
    pub fn new(compare: C) -> Self {
        Self::with_capacity(0, compare)
    }

    /// New an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        PriorityQueue {
            nodes: Slots::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            compare,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert an element, returning the key that identifies it.
    pub fn insert(&mut self, item: T) -> NodeKey {
        let position = self.heap.len();
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        let key = self.nodes.insert(Node {
            item,
            position,
            seq,
        });
        self.heap.push(key.index());
        self.sift_up(position);

        trace!("queue insert node:{:?}, len:{}", key, self.heap.len());
        NodeKey(key)
    }

    /// Remove and return the highest-priority element.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }

        let index = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.set_position(0);
            self.sift_down(0);
        }

        self.nodes.remove_at(index).map(|node| node.item)
    }

    /// The highest-priority element.
    pub fn peek(&self) -> Option<&T> {
        let index = *self.heap.first()?;
        self.nodes.get_at(index).map(|node| &node.item)
    }

    /// Key of the highest-priority element.
    pub fn peek_key(&self) -> Option<NodeKey> {
        let index = *self.heap.first()?;
        self.nodes.key_at(index).map(NodeKey)
    }

    /// Remove the element behind `key` wherever it sits in the heap.
    pub fn remove(&mut self, key: NodeKey) -> Result<T, QueueError> {
        let position = self
            .nodes
            .get(key.0)
            .map(|node| node.position)
            .ok_or(QueueError::StaleNode)?;

        self.heap.swap_remove(position);
        if position < self.heap.len() {
            self.set_position(position);
            // The element moved in from the tail may belong above or below.
            if !self.sift_up(position) {
                self.sift_down(position);
            }
        }

        self.nodes
            .remove(key.0)
            .map(|node| node.item)
            .ok_or(QueueError::StaleNode)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains(key.0)
    }

    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.nodes.get(key.0).map(|node| &node.item)
    }

    /// Mutable access to an element.
    ///
    /// Changing anything the comparator looks at leaves the queue out of
    /// order until `reorder` is called.
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        self.nodes.get_mut(key.0).map(|node| &mut node.item)
    }

    /// Restore heap order over every element.
    pub fn reorder(&mut self) {
        for position in (0..self.heap.len() / 2).rev() {
            self.sift_down(position);
        }
    }

    /// Drop every element. Outstanding keys go stale.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.nodes.clear();
    }

    /// Elements in heap layout order, not priority order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.heap
            .iter()
            .filter_map(move |index| self.nodes.get_at(*index))
            .map(|node| &node.item)
    }

    // Returns whether the element moved.
    fn sift_up(&mut self, mut position: usize) -> bool {
        let start = position;

        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.outranks(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }

        position != start
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();

        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut best = position;

            if left < len && self.outranks(left, best) {
                best = left;
            }
            if right < len && self.outranks(right, best) {
                best = right;
            }
            if best == position {
                break;
            }

            self.swap(position, best);
            position = best;
        }
    }

    // Whether the node at heap position `a` belongs above the one at `b`.
    fn outranks(&self, a: usize, b: usize) -> bool {
        let (a, b) = match (
            self.nodes.get_at(self.heap[a]),
            self.nodes.get_at(self.heap[b]),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        match (self.compare)(&a.item, &b.item) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a.seq < b.seq,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.set_position(a);
        self.set_position(b);
    }

    fn set_position(&mut self, position: usize) {
        let index = self.heap[position];
        if let Some(node) = self.nodes.get_at_mut(index) {
            node.position = position;
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.heap.len())
            .field(
                "root",
                &self
                    .heap
                    .first()
                    .and_then(|index| self.nodes.get_at(*index))
                    .map(|node| &node.item),
            )
            .finish()
    }
}

impl<T, C> fmt::Debug for PriorityQueueBuilder<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueueBuilder")
            .field("comparator", &self.compare.is_some())
            .field("capacity", &self.capacity)
            .finish()
    }
}
