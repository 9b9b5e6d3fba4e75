mod prelude;
mod completion;
pub mod scheduler;
pub use anyhow;
pub use chrono;
pub use clap;
pub use fern;
pub use lazy_static;
pub use libc;
pub use log;
pub use parking_lot;
pub use thiserror;

pub use completion::Completion;
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerError, Stopped};
