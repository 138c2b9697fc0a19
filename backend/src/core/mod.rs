//! Logical clock and event scheduler

pub mod scheduler;
pub mod time;
