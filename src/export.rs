//! Coordinate file for external heatmap tools.
//!
//! One event per line, latitude first: `"<lat> <lon>\n"`.

use crate::decode::decode_batch;
use crate::error::Result;
use crate::storage::EventStore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tweetmap_types::event::Event;

/// Write `events` as `lat lon` lines, returning the number of lines written.
pub fn write_coordinates<'a, W, I>(events: I, mut out: W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Event>,
{
    let mut written = 0;
    for event in events {
        writeln!(out, "{} {}", event.latitude(), event.longitude())?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Decode every stored event and write the coordinate file at `path`.
///
/// The file is only created once the whole batch decoded.
pub fn export_coordinates<S>(store: &S, path: impl AsRef<Path>) -> Result<usize>
where
    S: EventStore + ?Sized,
{
    let records = store.load_records()?;
    let events = decode_batch(&records)?;

    let file = File::create(path.as_ref())?;
    let written = write_coordinates(&events, BufWriter::new(file))?;

    log::info!(
        "Wrote {} coordinates to {}",
        written,
        path.as_ref().display()
    );
    Ok(written)
}
