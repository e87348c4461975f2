//! A "prelude" for users of the `tick-timer` crate.
//!
//! This prelude is similar to the standard library's prelude in that you'll
//! almost always want to import its entire contents, but unlike the standard
//! library's prelude you'll have to do so manually:
//!
//! ```
//! use tick_timer::prelude::*;
//! ```
//!
//! The prelude may grow over time as additional items see ubiquitous use.

pub use crate::entity::{RuntimeKind, SchedulerBuilder};
pub use crate::error::*;
pub use crate::queue::{Comparator, NodeKey, PriorityQueue, PriorityQueueBuilder};
pub use crate::timer::handler::TimerHandler;
pub use crate::timer::state::TimerState;
pub use crate::timer::ticker::{Ticker, TickerHandle};
pub use crate::timer::timer_core::{Scheduler, TimerId};

pub use crate::utils::convenience::functions::{
    create_default_timer_handler, create_timer_handler,
};

pub use anyhow::{anyhow, Result as AnyResult};
pub use thiserror::Error;

cfg_status_report!(
    pub use crate::utils::status_report::{PublicEvent, StatusReporter};
    pub(crate) use smol::channel::{unbounded, Receiver as AsyncReceiver, Sender as AsyncSender};
);

pub(crate) use log::{debug, trace, warn};
pub(crate) use std::cmp::Ordering;
pub(crate) use tracing::{debug_span, instrument};
