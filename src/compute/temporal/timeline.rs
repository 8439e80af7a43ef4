//! Ordered result of an aggregation.

use chrono::{DateTime, Duration, Utc};
use std::ops::Index;
use tweetmap_types::window::Window;

/// Windows of one aggregation, ascending by start and spaced exactly one
/// width apart.
///
/// A `Timeline` always holds at least one window and can only be built by
/// [`aggregate`](super::aggregate). Frame `i` of a playback is `timeline[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    windows: Vec<Window>,
    width: Duration,
}

impl Timeline {
    pub(crate) fn new(windows: Vec<Window>, width: Duration) -> Self {
        debug_assert!(!windows.is_empty());
        debug_assert!(
            windows
                .windows(2)
                .all(|pair| pair[1].start() - pair[0].start() == width)
        );
        Self { windows, width }
    }

    pub fn width(&self) -> Duration {
        self.width
    }

    /// Number of windows, empty ones included.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Always `false`; an aggregation never yields zero windows.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Window> {
        self.windows.get(index)
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    /// Start of the first window, which is the earliest event's timestamp.
    pub fn first_start(&self) -> DateTime<Utc> {
        self.windows[0].start()
    }

    pub fn last_start(&self) -> DateTime<Utc> {
        self.windows[self.windows.len() - 1].start()
    }

    /// Total number of events across all windows.
    pub fn event_count(&self) -> usize {
        self.windows.iter().map(Window::len).sum()
    }

    /// Number of windows that hold no events.
    pub fn empty_window_count(&self) -> usize {
        self.windows.iter().filter(|w| w.is_empty()).count()
    }

    /// Index of the window that covers `instant`, if the timeline covers it.
    pub fn locate(&self, instant: DateTime<Utc>) -> Option<usize> {
        if instant < self.first_start() {
            return None;
        }

        let offset = total_nanos(instant - self.first_start());
        let index = usize::try_from(offset / total_nanos(self.width)).ok()?;

        (index < self.windows.len()).then_some(index)
    }

    pub fn into_windows(self) -> Vec<Window> {
        self.windows
    }
}

// i128 holds any TimeDelta in nanoseconds
fn total_nanos(delta: Duration) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

impl Index<usize> for Timeline {
    type Output = Window;

    fn index(&self, index: usize) -> &Self::Output {
        &self.windows[index]
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}
