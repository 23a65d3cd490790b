//! Map Module
//!
//! Provides the generic expiring map and its lazy iteration guard.

mod entry;
mod iter;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use iter::{Entries, Iter};
pub use stats::MapStats;
pub use store::ExpiryMap;

pub(crate) use store::Shared;
