//! Expiry Map - A generic in-memory map with time-based expiry
//!
//! Entries are dropped a fixed delay after their last write by a background
//! sweep task, not by per-entry timers.

pub mod config;
pub mod error;
pub mod map;
mod tasks;

pub use config::Config;
pub use error::{ExpiryError, Result};
pub use map::{Entries, ExpiryMap, Iter, MapStats};
