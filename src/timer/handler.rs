//! Callback side of a timer.

use crate::prelude::*;

/// The work a timer does when it expires.
///
/// The handler gets the scheduler itself, so it can start, stop or
/// reconfigure timers (its own included) while it runs. Changes are seen by
/// the same `advance_tick` call: a timer started with delay 0 from inside a
/// callback fires before that call returns.
///
/// Any `FnMut(&mut Scheduler<D>, TimerId, &mut D)` closure is a handler.
pub trait TimerHandler<D> {
    /// Called once per expiry with the timer's own id and user data.
    fn on_expire(&mut self, scheduler: &mut Scheduler<D>, timer: TimerId, data: &mut D);
}

// Storing `Box<dyn TimerHandler<D>>` lets one scheduler hold closures and
// user types side by side, which a generic parameter couldn't.
impl<D, F> TimerHandler<D> for F
where
    F: FnMut(&mut Scheduler<D>, TimerId, &mut D),
{
    fn on_expire(&mut self, scheduler: &mut Scheduler<D>, timer: TimerId, data: &mut D) {
        self(scheduler, timer, data)
    }
}
