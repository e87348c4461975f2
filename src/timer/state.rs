/// Lifecycle state of a timer inside a `Scheduler`.
///
/// ```text
/// Idle ──start──> Scheduled ──tick──> Firing ──period == 0──> Fired
///                  ^    │                │
///                  │   stop            period > 0
///                  │    v                │
///                  │  Stopped            │
///                  └─────────────────────┘
/// ```
///
/// `Fired`, `Stopped` and `Idle` timers can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerState {
    /// Bound to a handler but never started.
    Idle,
    /// Waiting in the queue for its expiry tick.
    Scheduled,
    /// Its callback is running.
    Firing,
    /// A one-shot timer that has fired.
    Fired,
    /// Stopped before (or while) firing.
    Stopped,
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Idle
    }
}

impl TimerState {
    /// Whether the timer will fire again without another `start`.
    pub fn is_pending(&self) -> bool {
        matches!(self, TimerState::Scheduled)
    }
}
