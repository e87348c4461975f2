use crate::prelude::*;

/// A handler that does nothing when its timer expires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl<D> TimerHandler<D> for NoopHandler {
    fn on_expire(&mut self, _: &mut Scheduler<D>, _: TimerId, _: &mut D) {}
}

/// Hands the timer's user data to a closure that doesn't care about the
/// scheduler.
#[derive(Debug, Clone, Copy)]
pub struct DataHandler<F>(pub F);

impl<D, F> TimerHandler<D> for DataHandler<F>
where
    F: FnMut(&mut D),
{
    fn on_expire(&mut self, _: &mut Scheduler<D>, _: TimerId, data: &mut D) {
        (self.0)(data)
    }
}

pub mod functions {
    use super::{DataHandler, NoopHandler};
    use crate::prelude::*;

    #[inline(always)]
    ///convert handler of impl TimerHandler to a `Box<dyn TimerHandler>`.
    pub fn create_timer_handler<D>(
        handler: impl TimerHandler<D> + 'static,
    ) -> Box<dyn TimerHandler<D>> {
        Box::new(handler) as Box<dyn TimerHandler<D>>
    }

    #[inline(always)]
    ///Create a Box<dyn TimerHandler> that does nothing.
    pub fn create_default_timer_handler<D>() -> Box<dyn TimerHandler<D>> {
        create_timer_handler(NoopHandler)
    }

    #[inline(always)]
    ///Create a Box<dyn TimerHandler> that only touches the timer's data.
    pub fn create_data_handler<D, F>(f: F) -> Box<dyn TimerHandler<D>>
    where
        D: 'static,
        F: FnMut(&mut D) + 'static,
    {
        create_timer_handler(DataHandler(f))
    }
}
