use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};

/// A geotagged event: where it happened and when.
///
/// The coordinate is kept exactly as read from the store, `x` is the longitude
/// and `y` the latitude. Nothing here projects or converts units.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use geo::Point;
/// use tweetmap_types::event::Event;
///
/// let at = Utc.with_ymd_and_hms(2018, 10, 10, 0, 0, 30).unwrap();
/// let event = Event::new(Point::new(-74.0060, 40.7128), at);
/// assert_eq!(event.latitude(), 40.7128);
/// assert_eq!(*event.timestamp(), at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub coordinate: Point<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(coordinate: Point<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }

    pub fn coordinate(&self) -> &Point<f64> {
        &self.coordinate
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    /// Get the longitude (x of the coordinate).
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.coordinate.x()
    }

    /// Get the latitude (y of the coordinate).
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.coordinate.y()
    }
}
