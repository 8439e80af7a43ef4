//! Compute layer: aggregation and validation.
//!
//! This module separates the algorithms from storage and playback concerns.
//! It provides:
//! - Temporal aggregation of events into gapless windows
//! - Coordinate validation
//! - GeoJSON conversion of windows
//!
//! Nothing in here touches the filesystem or the clock.

#[cfg(feature = "geojson")]
pub mod geojson;
pub mod temporal;
pub mod validation;
