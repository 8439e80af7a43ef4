//! Event store abstraction
//!
//! The aggregator only ever asks a store for one thing: every known event as
//! an undecoded record, read as a complete batch at call time. Decoding is
//! done by the caller so that every backend gets the same strict checks.

use crate::decode::{RawRecord, format_timestamp};
use crate::error::StoreError;
use tweetmap_types::event::Event;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Read side of an event store backend
pub trait EventStore {
    /// Return all known events as raw coordinate/timestamp records.
    fn load_records(&self) -> Result<Vec<RawRecord>, StoreError>;
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn load_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        (**self).load_records()
    }
}

impl<S: EventStore + ?Sized> EventStore for Box<S> {
    fn load_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        (**self).load_records()
    }
}

/// In-memory event store backed by a `Vec`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<RawRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Build a store holding already-decoded events.
    ///
    /// Timestamps are truncated to whole seconds, see [`push_event`](Self::push_event).
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut store = Self::new();
        for event in events {
            store.push_event(event);
        }
        store
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    /// Store an event in the same textual shape a persistent store uses.
    ///
    /// The stored creation time has one-second resolution, so any
    /// sub-second part of the timestamp is dropped.
    pub fn push_event(&mut self, event: &Event) {
        self.records.push(RawRecord {
            coordinates: format!("[{}, {}]", event.longitude(), event.latitude()),
            created_at: format_timestamp(event.timestamp()),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn load_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self.records.clone())
    }
}
