use crate::prelude::*;
use crate::queue::NodeKey;

/// One timer record, owned by the scheduler's timer arena.
pub(crate) struct Timer<D> {
    /// Absolute tick at which the timer becomes due.
    pub(crate) expiry: u64,
    /// Re-arm interval; 0 means one-shot.
    pub(crate) period: u64,
    pub(crate) state: TimerState,
    /// Queue entry while scheduled.
    pub(crate) node: Option<NodeKey>,
    // Both are lent to the dispatch loop while the callback runs.
    pub(crate) handler: Option<Box<dyn TimerHandler<D>>>,
    pub(crate) data: Option<D>,
}

impl<D> Timer<D> {
    pub(crate) fn new(handler: Box<dyn TimerHandler<D>>, data: D) -> Self {
        Timer {
            expiry: 0,
            period: 0,
            state: TimerState::Idle,
            node: None,
            handler: Some(handler),
            data: Some(data),
        }
    }

    pub(crate) fn is_firing(&self) -> bool {
        self.state == TimerState::Firing
    }
}
