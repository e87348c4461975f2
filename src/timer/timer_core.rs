//! The tick-driven scheduler.
//!
//! # Scheduler
//!
//! A `Scheduler` owns a monotonic tick counter, the timers registered with
//! it, and a priority queue of the scheduled ones keyed by absolute expiry:
//!
//! 1. `start` computes `expiry = current_tick + delay` and queues the timer.
//! 2. `advance_tick` moves the counter forward by one and fires every timer
//! whose expiry has been reached, earliest first.
//! 3. A periodic timer is queued again at `expiry + period` after its
//! callback returns, unless the callback stopped or restarted it.
//!
//! Nothing here reads a clock. Whoever calls `advance_tick` defines what a
//! tick is; see `Ticker` for a runtime-driven source.

use super::Timer;
use crate::prelude::*;
use crate::queue::slot::{SlotKey, Slots};
use crate::queue::{Comparator, PriorityQueue};

use std::fmt;

cfg_status_report!(
    use crate::utils::status_report::StatusReporter;
);

/// Handle of a timer registered with a `Scheduler`.
///
/// Ids are checked: once the timer is removed (or the scheduler reset),
/// its id is rejected with `TimerError::InvalidTimer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(SlotKey);

// What the queue orders: a scheduled timer and the tick it is due.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Armed {
    expiry: u64,
    timer: TimerId,
}

fn by_expiry(a: &Armed, b: &Armed) -> Ordering {
    a.expiry.cmp(&b.expiry)
}

/// Tick-driven timer scheduler carrying user data of type `D` per timer.
pub struct Scheduler<D = ()> {
    // Scheduled timers, earliest expiry at the root.
    queue: PriorityQueue<Armed>,
    // Every registered timer, scheduled or not.
    timers: Slots<Timer<D>>,
    tick: u64,
    initial_tick: u64,
    // Set while the drain loop runs callbacks.
    dispatching: bool,
    #[cfg(feature = "status-report")]
    enable_status_report: bool,
    // Only set once the reporter is taken, so events never pile up unread.
    #[cfg(feature = "status-report")]
    status_report_sender: Option<AsyncSender<PublicEvent>>,
}

impl<D> Default for Scheduler<D> {
    fn default() -> Self {
        SchedulerBuilder::default().build()
    }
}

impl<D> fmt::Debug for Scheduler<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("tick", &self.tick)
            .field("timers", &self.timers.len())
            .field("scheduled", &self.queue.len())
            .field("next_expiry", &self.next_expiry())
            .finish()
    }
}

impl<D> Scheduler<D> {
    /// New a Scheduler at tick 0.
    pub fn new() -> Scheduler<D> {
        Self::default()
    }

    pub(crate) fn from_builder(builder: &SchedulerBuilder) -> Scheduler<D> {
        Scheduler {
            queue: PriorityQueue::with_capacity(builder.capacity, by_expiry as Comparator<Armed>),
            timers: Slots::with_capacity(builder.capacity),
            tick: builder.initial_tick,
            initial_tick: builder.initial_tick,
            dispatching: false,
            #[cfg(feature = "status-report")]
            enable_status_report: builder.enable_status_report,
            #[cfg(feature = "status-report")]
            status_report_sender: None,
        }
    }

    /// Drop every timer and rewind the tick to where the scheduler started.
    ///
    /// All outstanding `TimerId`s become invalid.
    pub fn reset(&mut self) {
        debug!(
            "scheduler reset at tick:{}, dropping {} timers",
            self.tick,
            self.timers.len()
        );

        self.queue.clear();
        self.timers.clear();
        self.tick = self.initial_tick;
    }

    /// Register a timer; it stays idle until `start`.
    pub fn add_timer<F>(&mut self, callback: F, data: D) -> TimerId
    where
        F: FnMut(&mut Scheduler<D>, TimerId, &mut D) + 'static,
    {
        self.add_timer_handler(Box::new(callback), data)
    }

    /// Register a timer with a boxed handler; it stays idle until `start`.
    pub fn add_timer_handler(&mut self, handler: Box<dyn TimerHandler<D>>, data: D) -> TimerId {
        let id = TimerId(self.timers.insert(Timer::new(handler, data)));
        trace!("timer {:?} added", id);
        id
    }

    /// Replace the handler of a timer. Takes effect from its next expiry.
    pub fn rebind<F>(&mut self, id: TimerId, callback: F) -> Result<(), TimerError>
    where
        F: FnMut(&mut Scheduler<D>, TimerId, &mut D) + 'static,
    {
        let timer = self.timer_mut(id)?;
        timer.handler = Some(Box::new(callback));
        Ok(())
    }

    /// Unregister a timer, stopping it first, and hand back its data.
    pub fn remove_timer(&mut self, id: TimerId) -> Result<D, TimerError> {
        let timer = self
            .timers
            .get_mut(id.0)
            .ok_or(TimerError::InvalidTimer(id))?;
        // Its callback holds the data until it returns, whatever the state.
        if timer.data.is_none() || timer.handler.is_none() {
            return Err(TimerError::Firing(id));
        }

        if let Some(node) = timer.node.take() {
            self.queue.remove(node)?;
        }

        let timer = self
            .timers
            .remove(id.0)
            .ok_or(TimerError::InvalidTimer(id))?;
        trace!("timer {:?} removed", id);
        timer.data.ok_or(TimerError::Firing(id))
    }

    /// Schedule a timer `delay` ticks from now.
    ///
    /// A periodic timer re-arms every `delay` ticks after that; with a
    /// delay of 0 it behaves as one-shot. Starting a timer that is already
    /// scheduled reschedules it.
    pub fn start(&mut self, id: TimerId, delay: u64, periodic: bool) -> Result<(), TimerError> {
        let tick = self.tick;
        let timer = self
            .timers
            .get_mut(id.0)
            .ok_or(TimerError::InvalidTimer(id))?;

        if let Some(node) = timer.node.take() {
            self.queue.remove(node)?;
            debug!("timer {:?} restarted before expiry:{}", id, timer.expiry);
        }

        let expiry = tick.saturating_add(delay);
        timer.expiry = expiry;
        timer.period = if periodic { delay } else { 0 };
        timer.state = TimerState::Scheduled;
        timer.node = Some(self.queue.insert(Armed { expiry, timer: id }));

        trace!(
            "timer {:?} started, tick:{}, expiry:{}, periodic:{}",
            id,
            tick,
            expiry,
            periodic
        );
        #[cfg(feature = "status-report")]
        self.report(PublicEvent::TimerStarted(id, expiry));

        Ok(())
    }

    /// Take a timer out of the schedule.
    ///
    /// Returns whether it was scheduled. Stopping an idle, fired or
    /// already stopped timer does nothing. Stopping a timer from inside its
    /// own callback cancels the periodic re-arm.
    pub fn stop(&mut self, id: TimerId) -> Result<bool, TimerError> {
        let timer = self
            .timers
            .get_mut(id.0)
            .ok_or(TimerError::InvalidTimer(id))?;

        let was_scheduled = match timer.node.take() {
            Some(node) => {
                self.queue.remove(node)?;
                timer.state = TimerState::Stopped;
                true
            }
            None => {
                if timer.is_firing() {
                    timer.state = TimerState::Stopped;
                }
                false
            }
        };

        trace!("timer {:?} stopped, was scheduled:{}", id, was_scheduled);
        #[cfg(feature = "status-report")]
        self.report(PublicEvent::TimerStopped(id));

        Ok(was_scheduled)
    }

    /// Change the re-arm interval. A pending expiry is left as it is.
    pub fn set_period(&mut self, id: TimerId, ticks: u64) -> Result<(), TimerError> {
        self.timer_mut(id)?.period = ticks;
        Ok(())
    }

    /// Advance the tick by one and fire every timer that is due.
    ///
    /// Returns the number of callbacks run. Called from inside a callback,
    /// or with the tick already at `u64::MAX`, it does nothing and returns 0.
    pub fn advance_tick(&mut self) -> usize {
        self.try_advance_tick().unwrap_or_else(|e| {
            warn!("advance_tick ignored: {}", e);
            0
        })
    }

    /// Like `advance_tick`, but reports a nested call or an exhausted tick
    /// counter as an error.
    pub fn try_advance_tick(&mut self) -> Result<usize, TimerError> {
        if self.dispatching {
            return Err(TimerError::ReentrantAdvance);
        }

        self.tick = self
            .tick
            .checked_add(1)
            .ok_or(TimerError::TickOverflow)?;
        self.dispatching = true;

        let mut fired = 0;
        // Re-peek after every dispatch: callbacks may have changed the queue.
        while self.next_expiry().map_or(false, |expiry| expiry <= self.tick) {
            let armed = match self.queue.pop() {
                Some(armed) => armed,
                None => break,
            };

            if self.dispatch(armed) {
                fired += 1;
            }
        }

        self.dispatching = false;
        Ok(fired)
    }

    /// Advance the tick `ticks` times, returning the total callbacks run.
    pub fn advance_ticks(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.advance_tick()).sum()
    }

    // Run one popped timer's callback and re-arm it if periodic.
    fn dispatch(&mut self, armed: Armed) -> bool {
        let id = armed.timer;
        let tick = self.tick;

        let (mut handler, mut data) = match self.timers.get_mut(id.0) {
            Some(timer) => {
                timer.node = None;
                match (timer.handler.take(), timer.data.take()) {
                    (Some(handler), Some(data)) => {
                        timer.state = TimerState::Firing;
                        (handler, data)
                    }
                    (handler, data) => {
                        timer.handler = handler;
                        timer.data = data;
                        warn!("timer {:?} popped while its callback is out", id);
                        return false;
                    }
                }
            }
            None => {
                warn!("queue held timer {:?} that no longer exists", id);
                return false;
            }
        };

        let span = debug_span!("timer_fire", timer = ?id, tick);
        let _enter = span.enter();

        trace!("timer {:?} fire, expiry:{}, tick:{}", id, armed.expiry, tick);
        handler.on_expire(self, id, &mut data);

        #[cfg(feature = "status-report")]
        self.report(PublicEvent::TimerFired(id, tick));

        let timer = match self.timers.get_mut(id.0) {
            Some(timer) => timer,
            // A `reset` inside the callback.
            None => return true,
        };

        // A handler bound via `rebind` during the callback wins.
        if timer.handler.is_none() {
            timer.handler = Some(handler);
        }
        timer.data = Some(data);

        // Stopped or restarted by its own callback otherwise.
        if timer.is_firing() {
            if timer.period == 0 {
                timer.state = TimerState::Fired;
            } else {
                let expiry = timer.expiry.saturating_add(timer.period);
                timer.expiry = expiry;
                timer.state = TimerState::Scheduled;
                timer.node = Some(self.queue.insert(Armed { expiry, timer: id }));

                trace!("timer {:?} re-armed, expiry:{}", id, expiry);
                #[cfg(feature = "status-report")]
                self.report(PublicEvent::TimerRearmed(id, expiry));
            }
        }

        true
    }

    fn timer_mut(&mut self, id: TimerId) -> Result<&mut Timer<D>, TimerError> {
        self.timers
            .get_mut(id.0)
            .ok_or(TimerError::InvalidTimer(id))
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Expiry of the earliest scheduled timer.
    pub fn next_expiry(&self) -> Option<u64> {
        self.queue.peek().map(|armed| armed.expiry)
    }

    /// Id of the earliest scheduled timer.
    pub fn next_timer(&self) -> Option<TimerId> {
        self.queue.peek().map(|armed| armed.timer)
    }

    /// Ticks left until the earliest scheduled timer is due.
    pub fn ticks_until_next(&self) -> Option<u64> {
        self.next_expiry()
            .map(|expiry| expiry.saturating_sub(self.tick))
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers
            .get(id.0)
            .map_or(false, |timer| timer.node.is_some())
    }

    pub fn state(&self, id: TimerId) -> Option<TimerState> {
        self.timers.get(id.0).map(|timer| timer.state)
    }

    pub fn expiry(&self, id: TimerId) -> Option<u64> {
        self.timers.get(id.0).map(|timer| timer.expiry)
    }

    pub fn period(&self, id: TimerId) -> Option<u64> {
        self.timers.get(id.0).map(|timer| timer.period)
    }

    /// User data of a timer. `None` while the timer's own callback holds it.
    pub fn data(&self, id: TimerId) -> Option<&D> {
        self.timers.get(id.0).and_then(|timer| timer.data.as_ref())
    }

    /// Mutable user data of a timer. `None` while the timer's own callback holds it.
    pub fn data_mut(&mut self, id: TimerId) -> Option<&mut D> {
        self.timers
            .get_mut(id.0)
            .and_then(|timer| timer.data.as_mut())
    }

    /// Number of registered timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of timers waiting in the queue.
    pub fn scheduled_count(&self) -> usize {
        self.queue.len()
    }

    /// Ids of every registered timer.
    pub fn timers(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.timers.iter().map(|(key, _)| TimerId(key))
    }
}

cfg_status_report!(
/// # Required features
///
/// This function requires the `status-report` feature of the `tick_timer`
/// crate to be enabled.
    impl<D> Scheduler<D> {
        /// Take StatusReporter from Scheduler, through which you can get public events.
        ///
        /// Events are published from this call on; earlier activity is not
        /// recorded. Returns `None` if the status report is disabled or the
        /// reporter was already taken.
        pub fn take_status_reporter(&mut self) -> Option<StatusReporter> {
            if !self.enable_status_report || self.status_report_sender.is_some() {
                return None;
            }

            let (sender, receiver) = unbounded::<PublicEvent>();
            self.status_report_sender = Some(sender);
            Some(StatusReporter::new(receiver))
        }

        fn report(&self, event: PublicEvent) {
            if let Some(sender) = self.status_report_sender.as_ref() {
                // Unbounded; only fails once every receiver is gone.
                let _ = sender.try_send(event);
            }
        }
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn noop(_: &mut Scheduler<u32>, _: TimerId, _: &mut u32) {}

    #[test]
    fn test_timer_state_transitions() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.add_timer(noop, 0);
        assert_eq!(scheduler.state(id), Some(TimerState::Idle));

        scheduler.start(id, 2, false).unwrap();
        assert_eq!(scheduler.state(id), Some(TimerState::Scheduled));
        assert_eq!(scheduler.expiry(id), Some(2));

        scheduler.advance_ticks(2);
        assert_eq!(scheduler.state(id), Some(TimerState::Fired));
        assert!(!scheduler.is_scheduled(id));

        scheduler.start(id, 1, true).unwrap();
        assert!(scheduler.stop(id).unwrap());
        assert_eq!(scheduler.state(id), Some(TimerState::Stopped));
        assert!(!scheduler.stop(id).unwrap());
    }

    #[test]
    fn test_data_travels_with_callback() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.add_timer(|_, _, hits: &mut u32| *hits += 1, 0);

        scheduler.start(id, 1, true).unwrap();
        scheduler.advance_ticks(5);

        assert_eq!(scheduler.data(id), Some(&5));
        assert_eq!(scheduler.remove_timer(id), Ok(5));
        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(scheduler.scheduled_count(), 0);
        assert_eq!(scheduler.state(id), None);
    }

    #[test]
    fn test_invalid_timer_rejected() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.add_timer(noop, 0);
        scheduler.remove_timer(id).unwrap();

        assert_eq!(scheduler.start(id, 1, false), Err(TimerError::InvalidTimer(id)));
        assert_eq!(scheduler.stop(id), Err(TimerError::InvalidTimer(id)));
        assert_eq!(scheduler.set_period(id, 3), Err(TimerError::InvalidTimer(id)));
    }

    #[test]
    fn test_restart_reschedules() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.add_timer(|_, _, hits: &mut u32| *hits += 1, 0);

        scheduler.start(id, 2, false).unwrap();
        scheduler.advance_tick();
        scheduler.start(id, 5, false).unwrap();

        assert_eq!(scheduler.scheduled_count(), 1);
        assert_eq!(scheduler.expiry(id), Some(6));
        assert_eq!(scheduler.advance_ticks(4), 0);
        assert_eq!(scheduler.advance_tick(), 1);
        assert_eq!(scheduler.data(id), Some(&1));
    }

    #[test]
    fn test_nested_advance_rejected() {
        let mut scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(None));
        let seen_ref = seen.clone();

        let id = scheduler.add_timer(
            move |scheduler: &mut Scheduler<()>, _, _: &mut ()| {
                *seen_ref.borrow_mut() = Some(scheduler.try_advance_tick());
                assert_eq!(scheduler.advance_tick(), 0);
            },
            (),
        );
        scheduler.start(id, 1, false).unwrap();
        scheduler.advance_tick();

        assert_eq!(*seen.borrow(), Some(Err(TimerError::ReentrantAdvance)));
        assert_eq!(scheduler.current_tick(), 1);
    }

    #[test]
    fn test_remove_self_while_firing() {
        let mut scheduler = Scheduler::new();
        let result = Rc::new(RefCell::new(None));
        let result_ref = result.clone();

        let id = scheduler.add_timer(
            move |scheduler: &mut Scheduler<u32>, id, _: &mut u32| {
                *result_ref.borrow_mut() = Some(scheduler.remove_timer(id));
            },
            7,
        );
        scheduler.start(id, 1, false).unwrap();
        scheduler.advance_tick();

        assert_eq!(*result.borrow(), Some(Err(TimerError::Firing(id))));
        assert_eq!(scheduler.remove_timer(id), Ok(7));
    }

    #[test]
    fn test_remove_self_after_stop_or_restart_keeps_timer() {
        type Outcome = Rc<RefCell<Vec<Result<u32, TimerError>>>>;
        let outcome: Outcome = Rc::default();
        let mut scheduler = Scheduler::new();

        let seen = outcome.clone();
        let stopper = scheduler.add_timer(
            move |scheduler: &mut Scheduler<u32>, id, _: &mut u32| {
                scheduler.stop(id).unwrap();
                seen.borrow_mut().push(scheduler.remove_timer(id));
            },
            7,
        );
        let seen = outcome.clone();
        let restarter = scheduler.add_timer(
            move |scheduler: &mut Scheduler<u32>, id, _: &mut u32| {
                scheduler.start(id, 3, false).unwrap();
                seen.borrow_mut().push(scheduler.remove_timer(id));
            },
            8,
        );

        scheduler.start(stopper, 1, true).unwrap();
        scheduler.start(restarter, 1, false).unwrap();
        assert_eq!(scheduler.advance_tick(), 2);

        assert_eq!(
            *outcome.borrow(),
            vec![
                Err(TimerError::Firing(stopper)),
                Err(TimerError::Firing(restarter))
            ]
        );
        assert_eq!(scheduler.timer_count(), 2);
        assert_eq!(scheduler.state(stopper), Some(TimerState::Stopped));
        assert!(scheduler.is_scheduled(restarter));
        assert_eq!(scheduler.expiry(restarter), Some(4));

        assert_eq!(scheduler.remove_timer(stopper), Ok(7));
        assert_eq!(scheduler.remove_timer(restarter), Ok(8));
        assert_eq!(scheduler.scheduled_count(), 0);
    }

    #[test]
    fn test_tick_overflow_rejected() {
        let mut scheduler: Scheduler<u32> = SchedulerBuilder::default()
            .initial_tick(u64::MAX - 1)
            .build();
        let id = scheduler.add_timer(|_, _, hits: &mut u32| *hits += 1, 0);
        scheduler.start(id, 5, false).unwrap();
        assert_eq!(scheduler.expiry(id), Some(u64::MAX));

        assert_eq!(scheduler.try_advance_tick(), Ok(1));
        assert_eq!(scheduler.try_advance_tick(), Err(TimerError::TickOverflow));
        assert_eq!(scheduler.advance_tick(), 0);
        assert_eq!(scheduler.current_tick(), u64::MAX);
        assert_eq!(scheduler.data(id), Some(&1));
    }

    #[test]
    fn test_next_timer_and_registered_ids() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.add_timer(noop, 0);
        let early = scheduler.add_timer(noop, 0);
        let idle = scheduler.add_timer(noop, 0);

        assert_eq!(scheduler.next_timer(), None);
        scheduler.start(late, 9, false).unwrap();
        scheduler.start(early, 4, true).unwrap();
        assert_eq!(scheduler.next_timer(), Some(early));
        assert!(scheduler.state(early).map_or(false, |state| state.is_pending()));
        assert!(!scheduler.state(idle).map_or(true, |state| state.is_pending()));

        scheduler.remove_timer(early).unwrap();
        assert_eq!(scheduler.next_timer(), Some(late));

        let ids: Vec<TimerId> = scheduler.timers().collect();
        assert_eq!(ids, vec![late, idle]);
    }

    #[test]
    fn test_builder_initial_tick_and_reset() {
        let mut scheduler: Scheduler<u32> = SchedulerBuilder::default()
            .initial_tick(100)
            .capacity(4)
            .build();
        let id = scheduler.add_timer(noop, 0);
        scheduler.start(id, 3, false).unwrap();
        assert_eq!(scheduler.expiry(id), Some(103));
        assert_eq!(scheduler.ticks_until_next(), Some(3));

        scheduler.advance_ticks(2);
        scheduler.reset();

        assert_eq!(scheduler.current_tick(), 100);
        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(scheduler.next_expiry(), None);
        assert_eq!(scheduler.state(id), None);
    }
}
