//! Eddy - ocean current feature collections from netCDF.
//!
//! Eddy loads a gridded, time-varying current dataset once, derives speed
//! (knots) and bearing (degrees clockwise from north) for every point and
//! timestamp, and serves nearest-time, bounding-box queries as GeoJSON
//! feature collections.
//!
//! # Pipeline
//!
//! - [`data`] reads `u`, `v`, `time`, `latitude` and `longitude`
//! - [`field`] derives speed and bearing
//! - [`feature`] encodes one feature collection per timestamp
//! - [`store`] holds the immutable result
//! - [`query`] resolves a time and filters by bounding box
//!
//! # Example
//!
//! ```ignore
//! use eddy::{Dataset, QueryEngine, VariableNames};
//! use std::path::Path;
//!
//! let dataset = Dataset::open(Path::new("currents.nc"), &VariableNames::default())?;
//! let engine = QueryEngine::new(dataset);
//!
//! let fc = engine.get_feature_collection(12.0, 40.0, 45.0, -72.0, -65.0);
//! println!("{}", serde_json::to_string(&fc)?);
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod feature;
pub mod field;
pub mod query;
pub mod store;

pub use config::VariableNames;
pub use error::{EddyError, Result};
pub use feature::{Feature, FeatureCollection};
pub use query::{BoundingBox, QueryEngine, QueryRequest};
pub use store::{Dataset, TimeAxis};
