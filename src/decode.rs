//! Strict decoding of stored records into events.
//!
//! A stored record is a pair of strings: the coordinate as a JSON array
//! `[longitude, latitude]` and the creation time in the streaming API's
//! fixed format. A record decodes completely or not at all.

use crate::error::{Result, TweetmapError};
use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use tweetmap_types::event::Event;

/// Creation-time format used by the streaming API, e.g.
/// `Wed Oct 10 20:19:24 +0000 2018`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// An undecoded record as it comes out of an event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub coordinates: String,
    pub created_at: String,
}

impl RawRecord {
    pub fn new(coordinates: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            coordinates: coordinates.into(),
            created_at: created_at.into(),
        }
    }
}

/// Parse a creation time and normalize it to UTC.
///
/// # Examples
///
/// ```
/// use tweetmap::decode::parse_timestamp;
///
/// let at = parse_timestamp("Wed Oct 10 20:19:24 +0000 2018").unwrap();
/// assert_eq!(at.to_rfc3339(), "2018-10-10T20:19:24+00:00");
///
/// assert!(parse_timestamp("2018-10-10 20:19:24").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TweetmapError::MalformedTimestamp {
            value: value.to_string(),
        })
}

/// Format an instant the way the streaming API does.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format("%a %b %d %H:%M:%S +0000 %Y").to_string()
}

/// Parse a `[longitude, latitude]` JSON array.
///
/// Extra trailing components are ignored. Values are not range-checked.
pub fn parse_coordinates(value: &str) -> Result<Point<f64>> {
    let malformed = || TweetmapError::MalformedCoordinates {
        value: value.to_string(),
    };

    let components: Vec<f64> = serde_json::from_str(value).map_err(|_| malformed())?;

    match components.as_slice() {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(Point::new(*lon, *lat)),
        _ => Err(malformed()),
    }
}

pub fn decode_record(record: &RawRecord) -> Result<Event> {
    let coordinate = parse_coordinates(&record.coordinates)?;
    let timestamp = parse_timestamp(&record.created_at)?;
    Ok(Event::new(coordinate, timestamp))
}

/// Decode a whole batch. The first bad record fails the batch.
pub fn decode_batch(records: &[RawRecord]) -> Result<Vec<Event>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            decode_record(record).inspect_err(|e| {
                log::debug!("Record at index {} failed to decode: {}", idx, e);
            })
        })
        .collect()
}
