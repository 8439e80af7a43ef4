//! Aggregation of geotagged tweets into gapless time windows for animated
//! map playback.
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use tweetmap::{Event, Point, aggregate};
//!
//! let t0 = Utc.with_ymd_and_hms(2018, 10, 10, 0, 0, 30).unwrap();
//! let events = vec![
//!     Event::new(Point::new(-74.0060, 40.7128), t0),
//!     Event::new(Point::new(2.3522, 48.8566), t0 + Duration::minutes(3)),
//! ];
//!
//! let timeline = aggregate(events, Duration::minutes(1))?;
//! assert_eq!(timeline.len(), 4);
//! assert_eq!(timeline.empty_window_count(), 2);
//! # Ok::<(), tweetmap::TweetmapError>(())
//! ```

pub mod compute;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod ingest;
pub mod render;
pub mod storage;

pub use compute::temporal::{Timeline, aggregate, aggregate_store};
pub use config::{Config, FrameFormat};
pub use decode::RawRecord;
pub use error::{Result, StoreError, TweetmapError};

pub use geo::Point;
pub use tweetmap_types::event::Event;
pub use tweetmap_types::window::Window;

pub use storage::{EventStore, MemoryStore};

#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;

pub use render::{FrameSink, Player, TextSink};

#[cfg(feature = "geojson")]
pub use render::GeoJsonSink;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Result, Timeline, TweetmapError, aggregate, aggregate_store};

    pub use crate::{Event, Point, Window};

    pub use crate::{EventStore, MemoryStore};

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteStore;

    pub use crate::render::{FrameSink, NoopPacer, Player, TextSink, ThreadPacer};

    pub use chrono::Duration;
}
