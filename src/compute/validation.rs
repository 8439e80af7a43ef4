//! Range checks for tweet locations.

use crate::error::{Result, TweetmapError};
use geo::{Point, Polygon};
use std::ops::RangeInclusive;

const LONGITUDE: RangeInclusive<f64> = -180.0..=180.0;
const LATITUDE: RangeInclusive<f64> = -90.0..=90.0;

/// Check that a point is a finite WGS84 position, `x` longitude and `y`
/// latitude, bounds included.
///
/// # Examples
///
/// ```
/// use tweetmap::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// assert!(validate_geographic_point(&Point::new(-74.0060, 40.7128)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    check_axis("Longitude", point.x(), &LONGITUDE)?;
    check_axis("Latitude", point.y(), &LATITUDE)
}

fn check_axis(axis: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    // NaN and infinities fall outside every range
    let reason = if value.is_finite() {
        format!("out of range [{:?}, {:?}]", range.start(), range.end())
    } else {
        "must be finite".to_string()
    };
    Err(TweetmapError::InvalidInput(format!(
        "{} {}: {}",
        axis, reason, value
    )))
}

/// Check every vertex of a place bounding box.
///
/// ```
/// use tweetmap::compute::validation::validate_polygon;
/// use geo::polygon;
///
/// let paris = polygon![
///     (x: 2.22, y: 48.81),
///     (x: 2.47, y: 48.81),
///     (x: 2.47, y: 48.90),
///     (x: 2.22, y: 48.90),
/// ];
/// assert!(validate_polygon(&paris).is_ok());
/// ```
pub fn validate_polygon(polygon: &Polygon) -> Result<()> {
    polygon
        .exterior()
        .points()
        .enumerate()
        .try_for_each(|(idx, vertex)| {
            validate_geographic_point(&vertex).map_err(|e| {
                TweetmapError::InvalidInput(format!("Bounding box vertex {}: {}", idx, e))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_bounds_are_inclusive() {
        for (lon, lat) in [(180.0, 0.0), (-180.0, 0.0), (0.0, 90.0), (0.0, -90.0)] {
            assert!(validate_geographic_point(&Point::new(lon, lat)).is_ok());
        }
        assert!(validate_geographic_point(&Point::new(139.6917, 35.6895)).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_and_non_finite() {
        assert!(validate_geographic_point(&Point::new(180.1, 0.0)).is_err());
        assert!(validate_geographic_point(&Point::new(0.0, -90.5)).is_err());

        let err = validate_geographic_point(&Point::new(f64::NAN, 0.0)).unwrap_err();
        assert!(err.to_string().contains("Longitude must be finite"));

        let err = validate_geographic_point(&Point::new(0.0, f64::INFINITY)).unwrap_err();
        assert!(err.to_string().contains("Latitude must be finite"));
    }

    #[test]
    fn test_bounding_box_reports_vertex() {
        let bbox = geo::polygon![
            (x: 0.0, y: 0.0),
            (x: 200.0, y: 0.0),
            (x: 200.0, y: 10.0),
        ];
        let err = validate_polygon(&bbox).unwrap_err();
        assert!(err.to_string().contains("vertex 1"));
    }
}
