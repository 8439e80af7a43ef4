//! GeoJSON conversion for windows.

use crate::error::{Result, TweetmapError};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use tweetmap_types::window::Window;

/// Converts one window into a FeatureCollection of points.
///
/// The collection carries `index` and `window_start` (RFC 3339) as foreign
/// members so that a consumer can order frames without counting lines.
pub fn window_to_feature_collection(index: usize, window: &Window) -> FeatureCollection {
    let features = window
        .events()
        .iter()
        .map(|point| Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
            id: None,
            properties: None,
            foreign_members: None,
        })
        .collect();

    let mut members = JsonObject::new();
    members.insert("index".to_string(), JsonValue::from(index));
    members.insert(
        "window_start".to_string(),
        JsonValue::from(window.start().to_rfc3339()),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    }
}

/// Converts one window into a single-line GeoJSON string.
pub fn window_to_geojson(index: usize, window: &Window) -> Result<String> {
    let collection = window_to_feature_collection(index, window);
    serde_json::to_string(&collection).map_err(|e| {
        TweetmapError::Serialization(format!("Failed to serialize window {}: {}", index, e))
    })
}
