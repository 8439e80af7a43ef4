//! # tweetmap-types
//!
//! Plain data types shared by the tweetmap crates:
//!
//! - **Events**: `Event`, a geotagged instant
//! - **Windows**: `Window`, a half-open time bucket of coordinates
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! `Point` and chrono's `DateTime<Utc>`.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use geo::Point;
//! use tweetmap_types::event::Event;
//!
//! let at = Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap();
//! let event = Event::new(Point::new(2.3522, 48.8566), at);
//! assert_eq!(event.longitude(), 2.3522);
//! ```

pub mod event;
pub mod window;
