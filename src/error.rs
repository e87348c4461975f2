//! Public error of tick-timer..

use crate::prelude::*;

/// Error enumeration for `PriorityQueue` structural operations.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum QueueError {
    /// The builder was finished without binding a comparator.
    #[error("Priority queue needs a comparator.")]
    MissingComparator,
    /// The key does not refer to an element of this queue (any more).
    #[error("Node is not present in the priority queue.")]
    StaleNode,
}

/// Error enumeration for `Scheduler` operations.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum TimerError {
    /// The id was never issued by this scheduler, or the timer was removed.
    #[error("Timer {0:?} does not exist in this scheduler.")]
    InvalidTimer(TimerId),
    /// The timer is running its own callback right now.
    #[error("Timer {0:?} is inside its callback.")]
    Firing(TimerId),
    /// `advance_tick` was called from inside a timer callback.
    #[error("The tick can't be advanced from inside a timer callback.")]
    ReentrantAdvance,
    /// The tick counter is at `u64::MAX`.
    #[error("The tick counter can't move past u64::MAX.")]
    TickOverflow,
    /// Internal queue bookkeeping failed.
    #[error("Priority queue operation failed.")]
    Queue(#[from] QueueError),
}
