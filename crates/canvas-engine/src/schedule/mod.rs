//! Deferred callbacks on a logical clock
//!
//! The pipeline never sleeps or reads a wall clock. It schedules events
//! here, and whoever owns the scheduler decides how fast time moves: the
//! browser host advances it from `requestAnimationFrame`, tests advance it
//! by exact amounts.

mod scheduler;

pub use scheduler::{Scheduler, TimerHandle};
