//! Nearest-time, bounding-box queries over a [`Dataset`].

use crate::error::{EddyError, Result};
use crate::feature::{Feature, FeatureCollection};
use crate::store::Dataset;
use rayon::prelude::*;
use std::str::FromStr;
use std::sync::Arc;

/// Index of the latest timestamp not after `time`.
///
/// Ties resolve to the highest index. When every timestamp is after `time`
/// (or `time` is NaN) the earliest index, 0, is returned instead.
pub fn resolve_time_index(axis: &[f64], time: f64) -> usize {
    axis.partition_point(|&t| t <= time).saturating_sub(1)
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box. Inverted bounds are allowed and contain nothing.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::new(-90.0, 90.0, -180.0, 180.0)
    }

    /// Whether a point lies inside, edges included.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::world()
    }
}

/// Features of `collection` inside `bbox`, in their original order.
pub fn filter_collection(collection: &FeatureCollection, bbox: &BoundingBox) -> FeatureCollection {
    let features: Vec<Feature> = collection
        .features
        .iter()
        .filter(|f| bbox.contains(f.longitude(), f.latitude()))
        .cloned()
        .collect();
    FeatureCollection::new().with_features(features)
}

/// Resolve `time` against the dataset and filter that timestamp's features.
pub fn query(dataset: &Dataset, time: f64, bbox: &BoundingBox) -> FeatureCollection {
    let index = resolve_time_index(dataset.time_axis().values(), time);
    dataset
        .collection(index)
        .map(|fc| filter_collection(fc, bbox))
        .unwrap_or_default()
}

/// A single query: a time value and a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    /// Requested time in axis units.
    pub time: f64,
    /// Area of interest.
    pub bbox: BoundingBox,
}

impl FromStr for QueryRequest {
    type Err = EddyError;

    /// Parse `time min_lat max_lat min_lon max_lon`, whitespace or comma separated.
    /// A bare `time` queries the whole globe.
    fn from_str(s: &str) -> Result<Self> {
        let fields = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .map(|f| {
                f.parse::<f64>()
                    .map_err(|e| EddyError::InvalidQuery(format!("invalid number '{}': {}", f, e)))
            })
            .collect::<Result<Vec<f64>>>()?;

        match fields.as_slice() {
            [time] => Ok(Self {
                time: *time,
                bbox: BoundingBox::world(),
            }),
            [time, min_lat, max_lat, min_lon, max_lon] => Ok(Self {
                time: *time,
                bbox: BoundingBox::new(*min_lat, *max_lat, *min_lon, *max_lon),
            }),
            _ => Err(EddyError::InvalidQuery(format!(
                "expected 1 or 5 fields, got {}",
                fields.len()
            ))),
        }
    }
}

/// Cheap-to-clone handle for querying a shared dataset from many threads.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    dataset: Arc<Dataset>,
}

impl QueryEngine {
    /// Publish a fully built dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    /// Share an already published dataset.
    pub fn from_shared(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Time index that `time` resolves to.
    pub fn resolve(&self, time: f64) -> usize {
        resolve_time_index(self.dataset.time_axis().values(), time)
    }

    /// Query with an explicit bounding box.
    pub fn query(&self, time: f64, bbox: &BoundingBox) -> FeatureCollection {
        query(&self.dataset, time, bbox)
    }

    /// Query by individual bounds, in the order the map front end supplies them.
    pub fn get_feature_collection(
        &self,
        time: f64,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> FeatureCollection {
        self.query(time, &BoundingBox::new(min_lat, max_lat, min_lon, max_lon))
    }

    /// Answer many queries in parallel. Results follow input order.
    pub fn query_batch(&self, requests: &[QueryRequest]) -> Vec<FeatureCollection> {
        requests
            .par_iter()
            .map(|r| self.query(r.time, &r.bbox))
            .collect()
    }
}
