//! Bucketing of a batch of events into fixed-width windows.

use super::timeline::Timeline;
use crate::decode::decode_batch;
use crate::error::{Result, TweetmapError};
use crate::storage::EventStore;
use chrono::Duration;
use tweetmap_types::event::Event;
use tweetmap_types::window::Window;

/// Partition `events` into half-open windows of `width`, starting at the
/// earliest event and leaving no gaps.
///
/// Events are stably sorted by timestamp first, so events sharing an instant
/// keep their input order inside their window. Every multiple of `width`
/// between the first and the last event gets a window, even when nothing
/// happened in it. The sequence ends at the window of the latest event.
///
/// # Errors
///
/// - [`TweetmapError::InvalidWindowWidth`] if `width` is zero or negative,
///   checked before anything else.
/// - [`TweetmapError::EmptyInput`] if there are no events.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use geo::Point;
/// use tweetmap::compute::temporal::aggregate;
/// use tweetmap::Event;
///
/// let t0 = Utc.with_ymd_and_hms(2018, 10, 10, 0, 0, 30).unwrap();
/// let events = vec![
///     Event::new(Point::new(1.0, 1.0), t0 + Duration::seconds(155)),
///     Event::new(Point::new(2.0, 2.0), t0),
///     Event::new(Point::new(3.0, 3.0), t0 + Duration::seconds(40)),
/// ];
///
/// let timeline = aggregate(events, Duration::seconds(60))?;
/// let sizes: Vec<usize> = timeline.iter().map(|w| w.len()).collect();
/// assert_eq!(sizes, vec![2, 0, 1]);
/// assert_eq!(timeline[1].start(), t0 + Duration::seconds(60));
/// # Ok::<(), tweetmap::TweetmapError>(())
/// ```
pub fn aggregate<I>(events: I, width: Duration) -> Result<Timeline>
where
    I: IntoIterator<Item = Event>,
{
    check_width(width)?;

    let mut events: Vec<Event> = events.into_iter().collect();
    if events.is_empty() {
        return Err(TweetmapError::EmptyInput);
    }

    // sort_by_key is stable
    events.sort_by_key(|event| event.timestamp);

    let mut windows = Vec::new();
    let mut current = Window::new(events[0].timestamp);

    for event in &events {
        loop {
            let end = current.end(width).ok_or_else(|| invalid_width(width))?;
            if event.timestamp < end {
                break;
            }
            windows.push(std::mem::replace(&mut current, Window::new(end)));
        }
        current.push(event.coordinate);
    }
    windows.push(current);

    log::debug!(
        "Aggregated {} events into {} windows of {} s",
        events.len(),
        windows.len(),
        width.num_seconds()
    );

    Ok(Timeline::new(windows, width))
}

/// Read every record from `store`, decode the whole batch and aggregate it.
///
/// The width is checked before the store is touched. A store failure or a
/// single undecodable record aborts the call.
pub fn aggregate_store<S>(store: &S, width: Duration) -> Result<Timeline>
where
    S: EventStore + ?Sized,
{
    check_width(width)?;

    let records = store.load_records()?;
    let events = decode_batch(&records)?;
    let timeline = aggregate(events, width)?;

    log::info!(
        "Built {} windows ({} empty) from {} stored events",
        timeline.len(),
        timeline.empty_window_count(),
        timeline.event_count()
    );

    Ok(timeline)
}

fn check_width(width: Duration) -> Result<()> {
    if width <= Duration::zero() {
        return Err(invalid_width(width));
    }
    Ok(())
}

fn invalid_width(width: Duration) -> TweetmapError {
    TweetmapError::InvalidWindowWidth {
        width_ms: width.num_milliseconds(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::RawRecord;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};
    use geo::Point;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 10, 10, h, m, s).unwrap()
    }

    fn event(x: f64, when: DateTime<Utc>) -> Event {
        Event::new(Point::new(x, 0.0), when)
    }

    fn sizes(timeline: &Timeline) -> Vec<usize> {
        timeline.iter().map(Window::len).collect()
    }

    #[test]
    fn test_three_windows_with_gap() {
        let events = vec![
            event(1.0, at(0, 0, 30)),
            event(2.0, at(0, 1, 10)),
            event(3.0, at(0, 3, 5)),
        ];
        let timeline = aggregate(events, Duration::seconds(60)).unwrap();

        assert_eq!(sizes(&timeline), vec![2, 0, 1]);
        assert_eq!(timeline[0].start(), at(0, 0, 30));
        assert_eq!(timeline[1].start(), at(0, 1, 30));
        assert_eq!(timeline[2].start(), at(0, 2, 30));
        assert_eq!(timeline[0].events(), &[Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
        assert_eq!(timeline[2].events(), &[Point::new(3.0, 0.0)]);
    }

    #[test]
    fn test_boundary_event_goes_to_next_window() {
        let width = Duration::seconds(60);
        let events = vec![event(1.0, at(0, 0, 0)), event(2.0, at(0, 1, 0))];
        let timeline = aggregate(events, width).unwrap();

        assert_eq!(sizes(&timeline), vec![1, 1]);
        assert_eq!(timeline[1].start(), at(0, 1, 0));
    }

    #[test]
    fn test_single_event() {
        let timeline = aggregate(vec![event(7.0, at(12, 0, 0))], Duration::minutes(5)).unwrap();

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].start(), at(12, 0, 0));
        assert_eq!(timeline[0].events(), &[Point::new(7.0, 0.0)]);
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let events = vec![
            event(3.0, at(0, 2, 0)),
            event(1.0, at(0, 0, 0)),
            event(2.0, at(0, 1, 0)),
        ];
        let timeline = aggregate(events, Duration::seconds(90)).unwrap();

        assert_eq!(sizes(&timeline), vec![2, 1]);
        assert_eq!(timeline[0].events(), &[Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
    }

    #[test]
    fn test_same_instant_keeps_input_order() {
        let when = at(1, 0, 0);
        let events = vec![
            event(9.0, when + Duration::seconds(1)),
            event(3.0, when),
            event(1.0, when),
            event(2.0, when),
        ];
        let timeline = aggregate(events, Duration::seconds(10)).unwrap();

        assert_eq!(
            timeline[0].events(),
            &[
                Point::new(3.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(9.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_long_gap_is_filled() {
        let events = vec![event(1.0, at(0, 0, 0)), event(2.0, at(0, 10, 0))];
        let timeline = aggregate(events, Duration::minutes(1)).unwrap();

        assert_eq!(timeline.len(), 11);
        assert_eq!(timeline.empty_window_count(), 9);
        for (i, window) in timeline.iter().enumerate() {
            assert_eq!(window.start(), at(0, 0, 0) + Duration::minutes(i as i64));
        }
    }

    #[test]
    fn test_no_trailing_empty_window() {
        let events = vec![event(1.0, at(0, 0, 0)), event(2.0, at(0, 0, 59))];
        let timeline = aggregate(events, Duration::minutes(1)).unwrap();

        assert_eq!(timeline.len(), 1);
        assert!(!timeline[timeline.len() - 1].is_empty());
    }

    #[test]
    fn test_sub_second_width() {
        let t0 = at(0, 0, 0);
        let events = vec![
            event(1.0, t0),
            event(2.0, t0 + Duration::milliseconds(250)),
            event(3.0, t0 + Duration::milliseconds(1_000)),
        ];
        let timeline = aggregate(events, Duration::milliseconds(250)).unwrap();

        assert_eq!(sizes(&timeline), vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_non_positive_width_rejected_first() {
        for width in [Duration::zero(), Duration::seconds(-1)] {
            assert!(matches!(
                aggregate(Vec::new(), width),
                Err(TweetmapError::InvalidWindowWidth { .. })
            ));
            assert!(matches!(
                aggregate(vec![event(1.0, at(0, 0, 0))], width),
                Err(TweetmapError::InvalidWindowWidth { .. })
            ));
        }
    }

    #[test]
    fn test_window_end_past_max_instant_rejected() {
        let last = DateTime::<Utc>::MAX_UTC - Duration::seconds(1);

        assert!(matches!(
            aggregate(vec![event(1.0, last)], Duration::days(1)),
            Err(TweetmapError::InvalidWindowWidth { .. })
        ));

        // A window that still ends in range is fine
        let timeline = aggregate(vec![event(1.0, last)], Duration::milliseconds(500)).unwrap();
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            aggregate(Vec::new(), Duration::seconds(60)),
            Err(TweetmapError::EmptyInput)
        ));
    }

    #[test]
    fn test_aggregate_store() {
        let store = MemoryStore::from_records(vec![
            RawRecord::new("[2.35, 48.85]", "Wed Oct 10 00:01:40 +0000 2018"),
            RawRecord::new("[-74.0, 40.7]", "Wed Oct 10 00:00:30 +0000 2018"),
        ]);
        let timeline = aggregate_store(&store, Duration::seconds(30)).unwrap();

        assert_eq!(sizes(&timeline), vec![1, 0, 1]);
        assert_eq!(timeline[0].events(), &[Point::new(-74.0, 40.7)]);
    }

    #[test]
    fn test_aggregate_store_rejects_corrupt_batch() {
        let store = MemoryStore::from_records(vec![
            RawRecord::new("[2.35, 48.85]", "Wed Oct 10 00:01:10 +0000 2018"),
            RawRecord::new("[-74.0, 40.7]", "10/10/2018 00:00:30"),
        ]);

        assert!(matches!(
            aggregate_store(&store, Duration::seconds(30)),
            Err(TweetmapError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_aggregate_store_propagates_store_error() {
        struct Broken;

        impl EventStore for Broken {
            fn load_records(&self) -> std::result::Result<Vec<RawRecord>, StoreError> {
                Err(StoreError::Unavailable("offline".to_string()))
            }
        }

        assert!(matches!(
            aggregate_store(&Broken, Duration::seconds(30)),
            Err(TweetmapError::EventStore(StoreError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_aggregate_store_checks_width_before_reading() {
        struct Unreachable;

        impl EventStore for Unreachable {
            fn load_records(&self) -> std::result::Result<Vec<RawRecord>, StoreError> {
                panic!("store must not be read with an invalid width");
            }
        }

        assert!(matches!(
            aggregate_store(&Unreachable, Duration::zero()),
            Err(TweetmapError::InvalidWindowWidth { width_ms: 0 })
        ));
    }
}
