//! Validation and recording of raw tweets.
//!
//! A tweet from the streaming API is kept only if it carries everything the
//! map needs: an id, a language, a creation time in the API format, and a place
//! of type `city` with a usable location. Anything else is rejected with a
//! typed reason and never reaches the store.

use crate::compute::validation::validate_geographic_point;
use crate::decode::parse_timestamp;
use chrono::{DateTime, Utc};
use geo::{Centroid, LineString, Point, Polygon};
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(feature = "sqlite")]
use crate::storage::SqliteStore;
#[cfg(feature = "sqlite")]
use std::io::BufRead;

const TWEET_FIELDS: [&str; 4] = ["lang", "place", "created_at", "id_str"];
const PLACE_FIELDS: [&str; 4] = ["country_code", "name", "id", "place_type"];

/// Why a tweet was not accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("tweet is not a JSON object")]
    NotAnObject,

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' is not a non-empty string: {value}")]
    InvalidField { field: String, value: String },

    #[error("place is not a city: {0}")]
    NotACity(String),

    #[error("malformed creation time: {0}")]
    MalformedTimestamp(String),

    #[error("tweet has no usable location")]
    MissingLocation,

    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// Place attached to an accepted tweet.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub country_code: String,
    pub name: String,
    pub place_type: String,
    /// Centroid of the place bounding box, when the tweet carried one.
    pub centroid: Option<Point<f64>>,
}

/// A tweet that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTweet {
    pub id: String,
    pub lang: String,
    pub created_at: DateTime<Utc>,
    pub place: Place,
    /// Exact point from the tweet's own `coordinates`, if any.
    pub coordinate: Option<Point<f64>>,
}

impl ValidatedTweet {
    /// The point the tweet is drawn at: its exact coordinate, otherwise the
    /// centroid of its place.
    pub fn location(&self) -> Option<Point<f64>> {
        self.coordinate.or(self.place.centroid)
    }
}

/// Counters of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

/// Check a tweet document and extract what the store needs.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tweetmap::ingest::validate_tweet;
///
/// let tweet = json!({
///     "id_str": "1050118621198921728",
///     "lang": "en",
///     "created_at": "Wed Oct 10 20:19:24 +0000 2018",
///     "coordinates": { "type": "Point", "coordinates": [-73.99, 40.73] },
///     "place": {
///         "id": "01a9a39529b27f36",
///         "country_code": "US",
///         "name": "Manhattan",
///         "place_type": "city"
///     }
/// });
///
/// let accepted = validate_tweet(&tweet).unwrap();
/// assert_eq!(accepted.place.name, "Manhattan");
/// assert!(accepted.location().is_some());
/// ```
pub fn validate_tweet(tweet: &Value) -> Result<ValidatedTweet, Rejection> {
    let result = check_tweet(tweet);
    if let Err(reason) = &result {
        log::debug!("The tweet failed the test: {}", reason);
    }
    result
}

fn check_tweet(tweet: &Value) -> Result<ValidatedTweet, Rejection> {
    let tweet = tweet.as_object().ok_or(Rejection::NotAnObject)?;

    for field in TWEET_FIELDS {
        if !tweet.contains_key(field) {
            return Err(Rejection::MissingField(field.to_string()));
        }
    }

    let id = required_str(tweet, "id_str", "id_str")?;
    let lang = required_str(tweet, "lang", "lang")?;
    let created_at_raw = required_str(tweet, "created_at", "created_at")?;

    let place_value = &tweet["place"];
    let place = place_value
        .as_object()
        .ok_or_else(|| invalid_field("place", place_value))?;

    for field in PLACE_FIELDS {
        if !place.contains_key(field) {
            return Err(Rejection::MissingField(format!("place.{}", field)));
        }
    }

    let place_id = required_str(place, "id", "place.id")?;
    let country_code = required_str(place, "country_code", "place.country_code")?;
    let name = required_str(place, "name", "place.name")?;
    let place_type = required_str(place, "place_type", "place.place_type")?;

    if place_type != "city" {
        return Err(Rejection::NotACity(place_type));
    }

    let created_at = parse_timestamp(&created_at_raw)
        .map_err(|_| Rejection::MalformedTimestamp(created_at_raw.clone()))?;

    let coordinate = match tweet.get("coordinates") {
        None | Some(Value::Null) => None,
        Some(value) => Some(point_from_geometry(value)?),
    };

    let centroid = match place.get("bounding_box") {
        None | Some(Value::Null) => None,
        Some(value) => Some(bounding_box_centroid(value)?),
    };

    if coordinate.is_none() && centroid.is_none() {
        return Err(Rejection::MissingLocation);
    }

    Ok(ValidatedTweet {
        id,
        lang,
        created_at,
        place: Place {
            id: place_id,
            country_code,
            name,
            place_type,
            centroid,
        },
        coordinate,
    })
}

fn required_str(object: &Map<String, Value>, key: &str, field: &str) -> Result<String, Rejection> {
    match object.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(other) => Err(invalid_field(field, other)),
        None => Err(Rejection::MissingField(field.to_string())),
    }
}

fn invalid_field(field: &str, value: &Value) -> Rejection {
    Rejection::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn coordinate_pair(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [lon, lat, ..] => Some((lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

/// GeoJSON `Point` geometry, as found in a tweet's `coordinates` field.
fn point_from_geometry(value: &Value) -> Result<Point<f64>, Rejection> {
    let bad = || Rejection::InvalidLocation(value.to_string());

    if value.get("type").and_then(Value::as_str) != Some("Point") {
        return Err(bad());
    }

    let (lon, lat) = value.get("coordinates").and_then(coordinate_pair).ok_or_else(bad)?;
    let point = Point::new(lon, lat);
    validate_geographic_point(&point).map_err(|e| Rejection::InvalidLocation(e.to_string()))?;
    Ok(point)
}

/// Centroid of a GeoJSON `Polygon` bounding box.
fn bounding_box_centroid(value: &Value) -> Result<Point<f64>, Rejection> {
    let bad = || Rejection::InvalidLocation(value.to_string());

    let ring = value
        .get("coordinates")
        .and_then(Value::as_array)
        .and_then(|rings| rings.first())
        .and_then(Value::as_array)
        .ok_or_else(bad)?;

    let coords = ring
        .iter()
        .map(coordinate_pair)
        .collect::<Option<Vec<(f64, f64)>>>()
        .ok_or_else(bad)?;

    if coords.is_empty() {
        return Err(bad());
    }

    let polygon = Polygon::new(LineString::from(coords), vec![]);
    crate::compute::validation::validate_polygon(&polygon)
        .map_err(|e| Rejection::InvalidLocation(e.to_string()))?;

    polygon
        .centroid()
        .or_else(|| polygon.exterior().points().next())
        .ok_or_else(bad)
}

/// Validate newline-delimited tweet documents and record the accepted ones.
///
/// Blank lines are skipped. Lines that are not JSON count as rejected.
/// A store failure stops the run.
#[cfg(feature = "sqlite")]
pub fn ingest_lines<R: BufRead>(reader: R, store: &mut SqliteStore) -> crate::Result<IngestStats> {
    let mut stats = IngestStats::default();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let document: Value = match serde_json::from_str(line) {
            Ok(document) => document,
            Err(e) => {
                log::debug!("Skipping line that is not JSON: {}", e);
                stats.rejected += 1;
                continue;
            }
        };

        match validate_tweet(&document) {
            Ok(tweet) => {
                if store.record(&tweet)? {
                    stats.accepted += 1;
                } else {
                    stats.duplicates += 1;
                }
            }
            Err(_) => stats.rejected += 1,
        }
    }

    log::info!(
        "Ingested {} tweets ({} rejected, {} duplicates)",
        stats.accepted,
        stats.rejected,
        stats.duplicates
    );

    Ok(stats)
}
