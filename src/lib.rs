//! tick-timer is a tick-driven software timer scheduler,
//! built on a priority queue ordered by expiry,
//! which makes it easy to run one-shot and periodic callbacks
//! from a hardware tick, a polling loop, an async runtime, or a test harness.
//!
//! # Usage
//!
//! ```
//! use tick_timer::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut scheduler = Scheduler::new();
//!
//! let blink = scheduler.add_timer(
//!     |scheduler: &mut Scheduler<Rc<RefCell<Vec<u64>>>>, _, log| {
//!         log.borrow_mut().push(scheduler.current_tick())
//!     },
//!     log.clone(),
//! );
//! scheduler.start(blink, 3, true)?;
//!
//! scheduler.advance_ticks(10);
//! assert_eq!(*log.borrow(), vec![3, 6, 9]);
//! # Ok::<(), TimerError>(())
//! ```
//!
//! 1. A `Scheduler` owns its timers; callers keep `TimerId` handles.
//! 2. Callbacks receive the scheduler and may start or stop any timer.
//! 3. `Ticker` drives `advance_tick` on `smol` or `tokio` in real time.
//! 4. `PriorityQueue` is usable on its own with any comparator.

#[macro_use]
mod macros;

pub mod entity;
pub mod error;
pub mod prelude;
pub mod queue;
pub mod timer;
pub mod utils;
