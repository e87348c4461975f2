//! A real-time tick source.
//!
//! # Ticker
//!
//! The scheduler only counts ticks. `Ticker` turns wall time into ticks by
//! sleeping on an async runtime's timer and calling `advance_tick` once per
//! period:
//!
//! 1. Deadlines are absolute (`start + n * period`), so time spent inside
//! callbacks does not drift the schedule. A late tick is caught up
//! immediately.
//! 2. `TickerHandle::stop` ends the loop before its next tick.

use crate::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering::Acquire, Ordering::Release};
use std::sync::Arc;
use std::time::{Duration, Instant};

use smol::Timer as SmolTimer;
use tokio::runtime::Builder as TokioBuilder;

// Set it. Motivation to move forward.
pub(crate) type SharedMotivation = Arc<AtomicBool>;

/// Drives a `Scheduler` from an async runtime.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    runtime_kind: RuntimeKind,
    shared_motivation: SharedMotivation,
}

/// Stops a running `Ticker` from anywhere, including another thread.
#[derive(Clone, Debug)]
pub struct TickerHandle {
    shared_motivation: SharedMotivation,
}

impl TickerHandle {
    /// The ticker returns before its next tick.
    pub fn stop(&self) {
        self.shared_motivation.store(false, Release);
    }

    pub fn is_running(&self) -> bool {
        self.shared_motivation.load(Acquire)
    }
}

impl Ticker {
    /// New a Ticker firing one tick every `period`, on the default runtime.
    pub fn new(period: Duration) -> Ticker {
        Ticker {
            period,
            runtime_kind: RuntimeKind::default(),
            shared_motivation: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Which runtime's timer to sleep on.
    pub fn runtime_kind(mut self, runtime_kind: RuntimeKind) -> Self {
        self.runtime_kind = runtime_kind;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn handle(&self) -> TickerHandle {
        TickerHandle {
            shared_motivation: self.shared_motivation.clone(),
        }
    }

    /// Tick `scheduler` until stopped or `max_ticks` ticks have been driven.
    ///
    /// Must be awaited inside the runtime picked with `runtime_kind`.
    /// Returns the number of ticks driven.
    #[instrument(skip(self, scheduler))]
    pub async fn run<D>(&self, scheduler: &mut Scheduler<D>, max_ticks: Option<u64>) -> u64 {
        let mut driven = 0u64;
        let mut when = Instant::now() + self.period;

        debug!(
            "ticker start, period:{:?}, runtime:{:?}",
            self.period, self.runtime_kind
        );

        while self.shared_motivation.load(Acquire) {
            if max_ticks.map_or(false, |max| driven >= max) {
                break;
            }

            self.sleep_until(when).await;
            if !self.shared_motivation.load(Acquire) {
                break;
            }

            let fired = scheduler.advance_tick();
            driven += 1;
            trace!("ticker tick:{}, fired:{}", scheduler.current_tick(), fired);

            when += self.period;
        }

        debug!("ticker exit after {} ticks", driven);
        driven
    }

    /// Block the current thread on the selected runtime while `run` drives
    /// the scheduler.
    pub fn run_blocking<D>(
        &self,
        scheduler: &mut Scheduler<D>,
        max_ticks: Option<u64>,
    ) -> AnyResult<u64> {
        match self.runtime_kind {
            RuntimeKind::Smol => Ok(smol::block_on(self.run(scheduler, max_ticks))),
            RuntimeKind::Tokio => {
                let runtime = TokioBuilder::new_current_thread().enable_time().build()?;
                Ok(runtime.block_on(self.run(scheduler, max_ticks)))
            }
        }
    }

    async fn sleep_until(&self, when: Instant) {
        match self.runtime_kind {
            RuntimeKind::Smol => {
                SmolTimer::at(when).await;
            }
            RuntimeKind::Tokio => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(when)).await;
            }
        }
    }
}
