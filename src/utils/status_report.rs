// status_report is mod for report timer activity
// if open feature status-report, then compile that mod .
use crate::prelude::*;

/// Receiving end of a scheduler's public events.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    inner: AsyncReceiver<PublicEvent>,
}

impl StatusReporter {
    /// Next event if one is waiting.
    pub fn next_public_event(&self) -> AnyResult<PublicEvent> {
        let event = self.inner.try_recv()?;
        Ok(event)
    }

    /// Wait for the next event.
    pub async fn next_public_event_with_async_wait(&self) -> AnyResult<PublicEvent> {
        let event = self.inner.recv().await?;
        Ok(event)
    }

    /// Every event waiting right now, oldest first.
    pub fn drain_public_events(&self) -> Vec<PublicEvent> {
        std::iter::from_fn(|| self.inner.try_recv().ok()).collect()
    }

    pub(crate) fn new(inner: AsyncReceiver<PublicEvent>) -> Self {
        Self { inner }
    }
}

/// Timer activity visible outside the scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PublicEvent {
    /// Timer queued with this expiry.
    TimerStarted(TimerId, u64),
    /// `stop` was called on the timer.
    TimerStopped(TimerId),
    /// Callback ran at this tick.
    TimerFired(TimerId, u64),
    /// Periodic timer queued again with this expiry.
    TimerRearmed(TimerId, u64),
}
