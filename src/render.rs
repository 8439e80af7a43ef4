//! Frame-by-frame playback of a timeline.
//!
//! One window is one frame. The player hands frames to a [`FrameSink`] in
//! chronological order and waits a fixed interval between two frames,
//! whatever the number of points in them, so that playback time stays
//! proportional to event time.

use crate::compute::temporal::Timeline;
use crate::error::Result;
use std::io::Write;
use std::time::Duration;
use tweetmap_types::window::Window;

/// A window about to be drawn, with its position in the playback.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: usize,
    pub total: usize,
    pub window: &'a Window,
}

impl Frame<'_> {
    /// Title shown above the map, e.g. `2018-10-10 00:00:30 (UTC)`.
    pub fn title(&self) -> String {
        format!("{} (UTC)", self.window.start().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Destination of rendered frames.
pub trait FrameSink {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Waits between two frames.
pub trait Pacer {
    fn wait(&mut self, interval: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn wait(&mut self, _interval: Duration) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub frames: usize,
    pub empty_frames: usize,
    pub points: usize,
}

/// Plays a timeline at a fixed frame interval.
pub struct Player<P: Pacer = ThreadPacer> {
    interval: Duration,
    pacer: P,
}

impl Player<ThreadPacer> {
    pub fn new(interval: Duration) -> Self {
        Self::with_pacer(interval, ThreadPacer)
    }
}

impl<P: Pacer> Player<P> {
    pub fn with_pacer(interval: Duration, pacer: P) -> Self {
        Self { interval, pacer }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Draw every window of `timeline` in order. A sink error stops playback.
    pub fn play<S>(&mut self, timeline: &Timeline, sink: &mut S) -> Result<PlaybackStats>
    where
        S: FrameSink + ?Sized,
    {
        let total = timeline.len();
        let mut stats = PlaybackStats::default();

        for (index, window) in timeline.iter().enumerate() {
            if index > 0 {
                self.pacer.wait(self.interval);
            }

            let frame = Frame {
                index,
                total,
                window,
            };
            sink.draw(&frame)?;

            stats.frames += 1;
            stats.points += window.len();
            if window.is_empty() {
                stats.empty_frames += 1;
            }
        }

        sink.finish()?;
        log::info!(
            "Played {} frames ({} empty, {} points)",
            stats.frames,
            stats.empty_frames,
            stats.points
        );
        Ok(stats)
    }
}

/// Plain-text frames: a title line, a point count, then `lon lat` per point.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextSink<W> {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        writeln!(
            self.out,
            "[{}/{}] {}: {} points",
            frame.index + 1,
            frame.total,
            frame.title(),
            frame.window.len()
        )?;
        for point in frame.window.events() {
            writeln!(self.out, "  {} {}", point.x(), point.y())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// One GeoJSON FeatureCollection per line.
#[cfg(feature = "geojson")]
pub struct GeoJsonSink<W: Write> {
    out: W,
}

#[cfg(feature = "geojson")]
impl<W: Write> GeoJsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(feature = "geojson")]
impl<W: Write> FrameSink for GeoJsonSink<W> {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        let line = crate::compute::geojson::window_to_geojson(frame.index, frame.window)?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
