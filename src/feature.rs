//! GeoJSON feature collections of current vectors.

use crate::error::{EddyError, Result};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection of current points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Features in grid index order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single current observation at one point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Point location.
    pub geometry: Geometry,

    /// Speed and direction.
    pub properties: CurrentProperties,
}

impl Feature {
    /// Create a point feature carrying a current vector.
    pub fn current(lon: f64, lat: f64, speed: f64, direction: f64) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::point(lon, lat),
            properties: CurrentProperties { speed, direction },
        }
    }

    /// Longitude of the point.
    pub fn longitude(&self) -> f64 {
        match self.geometry {
            Geometry::Point { coordinates } => coordinates[0],
        }
    }

    /// Latitude of the point.
    pub fn latitude(&self) -> f64 {
        match self.geometry {
            Geometry::Point { coordinates } => coordinates[1],
        }
    }
}

/// GeoJSON geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A point geometry.
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: [f64; 2],
    },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }
}

/// Feature properties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurrentProperties {
    /// Speed in knots.
    pub speed: f64,
    /// Bearing in degrees clockwise from north, in [0, 360).
    pub direction: f64,
}

/// Encode one feature collection per timestep.
///
/// Row `t` of `speed` and `bearing` becomes collection `t`. Points with zero
/// speed, or with any NaN among speed, bearing, latitude and longitude, are
/// left out.
pub fn encode(
    speed: &Array2<f64>,
    bearing: &Array2<f64>,
    latitude: &[f64],
    longitude: &[f64],
) -> Result<Vec<FeatureCollection>> {
    if speed.dim() != bearing.dim() {
        return Err(EddyError::shape_mismatch("speed/bearing", speed.len(), bearing.len()));
    }
    if latitude.len() != longitude.len() {
        return Err(EddyError::shape_mismatch(
            "latitude/longitude",
            latitude.len(),
            longitude.len(),
        ));
    }
    if speed.ncols() != latitude.len() {
        return Err(EddyError::shape_mismatch(
            "points per timestep vs coordinates",
            latitude.len(),
            speed.ncols(),
        ));
    }

    Ok(speed
        .outer_iter()
        .zip(bearing.outer_iter())
        .map(|(s, b)| encode_timestep(s, b, latitude, longitude))
        .collect())
}

fn encode_timestep(
    speed: ArrayView1<'_, f64>,
    bearing: ArrayView1<'_, f64>,
    latitude: &[f64],
    longitude: &[f64],
) -> FeatureCollection {
    let features = speed
        .iter()
        .zip(bearing.iter())
        .zip(latitude.iter().zip(longitude.iter()))
        .filter_map(|((&s, &b), (&lat, &lon))| {
            if s == 0.0 {
                return None;
            }
            if s.is_nan() || b.is_nan() || lat.is_nan() || lon.is_nan() {
                return None;
            }
            Some(Feature::current(lon, lat, s, b))
        })
        .collect();

    FeatureCollection::new().with_features(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn drops_zero_speed_and_nan() {
        let speed = array![[1.0, 0.0, 2.0, 3.0, f64::NAN]];
        let bearing = array![[10.0, 20.0, f64::NAN, 40.0, 50.0]];
        let lat = [0.0, 1.0, 2.0, 3.0, 4.0];
        let lon = [10.0, 11.0, 12.0, f64::NAN, 14.0];

        let collections = encode(&speed, &bearing, &lat, &lon).unwrap();
        assert_eq!(collections.len(), 1);
        let fc = &collections[0];
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].longitude(), 10.0);
        assert_eq!(fc.features[0].latitude(), 0.0);
        assert_eq!(fc.features[0].properties.direction, 10.0);
    }

    #[test]
    fn one_collection_per_timestep_in_grid_order() {
        let speed = array![[1.0, 2.0], [0.0, 0.0], [3.0, 4.0]];
        let bearing = array![[0.0, 90.0], [0.0, 0.0], [180.0, 270.0]];
        let lat = [5.0, -5.0];
        let lon = [50.0, -50.0];

        let collections = encode(&speed, &bearing, &lat, &lon).unwrap();
        assert_eq!(collections.len(), 3);
        assert!(collections[1].is_empty());
        let lons: Vec<f64> = collections[2].features.iter().map(Feature::longitude).collect();
        assert_eq!(lons, vec![50.0, -50.0]);
    }

    #[test]
    fn coordinate_count_must_match_points() {
        let speed = array![[1.0, 2.0]];
        let bearing = array![[0.0, 0.0]];
        assert!(matches!(
            encode(&speed, &bearing, &[0.0], &[0.0]),
            Err(EddyError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            encode(&speed, &bearing, &[0.0, 1.0], &[0.0]),
            Err(EddyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn serializes_as_geojson() {
        let fc = FeatureCollection::new().with_features(vec![Feature::current(-70.5, 41.25, 1.5, 90.0)]);
        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-70.5, 41.25] },
                    "properties": { "speed": 1.5, "direction": 90.0 }
                }]
            })
        );
    }
}
