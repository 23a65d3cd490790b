//! Background Tasks Module
//!
//! Contains the task that runs alongside every expiry map.
//!
//! # Tasks
//! - Expiry Sweep: Removes stale entries every sweep interval

mod sweep;

pub(crate) use sweep::{spawn_sweep_task, SweepHandle};
