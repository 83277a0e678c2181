//! Spaced-repetition scheduling.
//!
//! Pure computations only: no I/O, no clock reads, no shared state.

mod config;
mod sm2;

pub use config::SchedulerConfig;
pub use sm2::{review_card, Sm2Scheduler};
