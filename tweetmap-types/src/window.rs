use chrono::{DateTime, Duration, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};

/// A half-open time bucket `[start, start + width)` and the coordinates of
/// the events that fell into it, in the order they were placed.
///
/// The width is not stored per window; every window of one aggregation shares
/// the same width.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use geo::Point;
/// use tweetmap_types::window::Window;
///
/// let start = Utc.with_ymd_and_hms(2018, 10, 10, 0, 0, 30).unwrap();
/// let mut window = Window::new(start);
/// window.push(Point::new(2.35, 48.85));
///
/// let width = Duration::seconds(60);
/// assert!(window.contains(start + Duration::seconds(59), width));
/// assert!(!window.contains(start + width, width));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start: DateTime<Utc>,
    events: Vec<Point<f64>>,
}

impl Window {
    /// Open an empty window at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            events: Vec::new(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Coordinates placed in this window.
    pub fn events(&self) -> &[Point<f64>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, coordinate: Point<f64>) {
        self.events.push(coordinate);
    }

    /// Exclusive end of the window for the given width.
    ///
    /// Returns `None` if the end is not representable.
    pub fn end(&self, width: Duration) -> Option<DateTime<Utc>> {
        self.start.checked_add_signed(width)
    }

    /// Whether `instant` falls in `[start, start + width)`.
    pub fn contains(&self, instant: DateTime<Utc>, width: Duration) -> bool {
        match self.end(width) {
            Some(end) => self.start <= instant && instant < end,
            None => self.start <= instant,
        }
    }

    pub fn into_parts(self) -> (DateTime<Utc>, Vec<Point<f64>>) {
        (self.start, self.events)
    }
}
