//! Scheduler configuration.
//!
//! # SchedulerBuilder
//!
//! A `Scheduler` is an ordinary value: build as many as you need, keep each
//! one with the subsystem that owns its timers.
//!
//! 1. `initial_tick` sets where the counter starts (and where `reset`
//! rewinds to).
//! 2. `capacity` preallocates room for that many timers.
//! 3. `enable_status_report` (feature `status-report`) publishes timer
//! events to a `StatusReporter`.

use crate::prelude::*;

/// Builds Scheduler with custom configuration values.
///
/// Methods can be chained in order to set the configuration values. The
/// Scheduler is constructed by calling `build`.
///
/// # Examples
///
/// ```
/// use tick_timer::prelude::*;
///
/// let mut scheduler: Scheduler<&str> = SchedulerBuilder::default()
///     .initial_tick(10)
///     .capacity(16)
///     .build();
///
/// let id = scheduler.add_timer(|_, _, name| println!("{} fired", name), "blink");
/// scheduler.start(id, 5, true)?;
/// assert_eq!(scheduler.next_expiry(), Some(15));
/// # Ok::<(), TimerError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchedulerBuilder {
    pub(crate) initial_tick: u64,
    pub(crate) capacity: usize,
    /// Whether or not to enable the status-report
    #[cfg(feature = "status-report")]
    pub(crate) enable_status_report: bool,
}

impl SchedulerBuilder {
    /// Tick value the scheduler starts from.
    pub fn initial_tick(mut self, tick: u64) -> Self {
        self.initial_tick = tick;
        self
    }

    /// Number of timers to preallocate room for.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build Scheduler.
    pub fn build<D>(self) -> Scheduler<D> {
        debug!(
            "scheduler built, initial_tick:{}, capacity:{}",
            self.initial_tick, self.capacity
        );
        Scheduler::from_builder(&self)
    }
}

cfg_status_report!(
/// # Required features
///
/// This function requires the `status-report` feature of the `tick_timer`
/// crate to be enabled.
    impl SchedulerBuilder {
        /// Whether to expose public events.
        pub fn enable_status_report(mut self) -> Self {
            self.enable_status_report = true;
            self
        }
    }
);

/// Async-Runtime Kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Async-Runtime `smol` compatible with the async-std
    Smol,

    /// Async-Runtime `tokio`
    Tokio,
}

impl Default for RuntimeKind {
    fn default() -> Self {
        RuntimeKind::Tokio
    }
}
