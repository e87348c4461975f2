//! timer is the core module of the library, it provides the tick-driven
//! scheduler, the handler trait for timer callbacks, and a ticker that
//! drives the scheduler from an async runtime.

pub mod handler;
pub mod state;
pub mod ticker;
pub mod timer_core;

pub(crate) mod entry;

pub(crate) use entry::Timer;
