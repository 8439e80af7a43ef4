//! Temporal aggregation of events into gapless time windows.
//!
//! - `aggregate`: bucketing and gap-filling of a batch of events
//! - `timeline`: the ordered, read-only result of an aggregation

pub mod aggregate;
pub mod timeline;

pub use aggregate::{aggregate, aggregate_store};
pub use timeline::Timeline;
