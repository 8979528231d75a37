//! Immutable, fully precomputed dataset.

use crate::config::VariableNames;
use crate::data::{self, RawVariables, TimeUnits};
use crate::error::{EddyError, Result};
use crate::feature::{self, FeatureCollection};
use crate::field;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Ordered timestamps of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    values: Vec<f64>,
    units: Option<TimeUnits>,
}

impl TimeAxis {
    /// Create a time axis. Values are kept in file order.
    pub fn new(values: Vec<f64>, units: Option<TimeUnits>) -> Self {
        Self { values, units }
    }

    /// Axis values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the axis is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at an index.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Parsed units, if the time variable declared any.
    pub fn units(&self) -> Option<&TimeUnits> {
        self.units.as_ref()
    }

    /// Whether every value is no smaller than its predecessor.
    pub fn is_non_decreasing(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Calendar datetime of the timestamp at `index`.
    pub fn datetime_at(&self, index: usize) -> Option<NaiveDateTime> {
        let units = self.units.as_ref()?;
        units.to_datetime(self.get(index)?)
    }

    /// Convert a calendar datetime into an axis value.
    pub fn value_at(&self, datetime: NaiveDateTime) -> Result<f64> {
        self.units
            .as_ref()
            .map(|u| u.to_value(datetime))
            .ok_or_else(|| EddyError::InvalidTimeUnits("time axis has no units attribute".to_string()))
    }
}

/// Summary of a loaded dataset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetSummary {
    /// Source file, if loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Number of timestamps.
    pub timesteps: usize,
    /// Spatial points per timestamp, before exclusion.
    pub points: usize,
    /// First axis value.
    pub time_start: Option<f64>,
    /// Last axis value.
    pub time_end: Option<f64>,
    /// Time units, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_units: Option<String>,
    /// Surviving features per timestamp.
    pub features_per_timestep: Vec<usize>,
}

/// One feature collection per timestamp, built once and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: Option<PathBuf>,
    time_axis: TimeAxis,
    collections: Vec<FeatureCollection>,
    points: usize,
}

impl Dataset {
    /// Load, derive and encode a dataset file.
    ///
    /// Any failure along the way aborts the whole build.
    pub fn open(path: &Path, names: &VariableNames) -> Result<Self> {
        let raw = data::load(path, names)?;
        let mut dataset = Self::from_variables(raw)?;
        dataset.path = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Build a dataset from already-loaded variables.
    pub fn from_variables(raw: RawVariables) -> Result<Self> {
        let units = match raw.time.attribute("units") {
            Some(s) => match s.parse::<TimeUnits>() {
                Ok(units) => Some(units),
                Err(e) => {
                    warn!(units = s, error = %e, "Ignoring unparseable time units");
                    None
                }
            },
            None => None,
        };
        let time_axis = TimeAxis::new(raw.time.values(), units);
        if !time_axis.is_non_decreasing() {
            warn!(
                variable = %raw.time.name,
                "Time axis is not non-decreasing; nearest-time lookups assume sorted order"
            );
        }

        let derived = field::derive(raw.u.values(), raw.v.values(), time_axis.len())?;
        let latitude = raw.latitude.values();
        let longitude = raw.longitude.values();
        let collections = feature::encode(&derived.speed, &derived.bearing, &latitude, &longitude)?;

        let dataset = Self {
            path: None,
            time_axis,
            collections,
            points: latitude.len(),
        };
        info!(
            timesteps = dataset.time_axis.len(),
            points = dataset.points,
            features = dataset.collections.iter().map(FeatureCollection::len).sum::<usize>(),
            "Built dataset"
        );
        Ok(dataset)
    }

    /// Source file, if loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Time axis.
    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    /// Collection for a time index.
    pub fn collection(&self, index: usize) -> Option<&FeatureCollection> {
        self.collections.get(index)
    }

    /// All collections, indexed by time index.
    pub fn collections(&self) -> &[FeatureCollection] {
        &self.collections
    }

    /// Spatial points per timestamp, before exclusion.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Summarize the dataset.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            path: self.path.clone(),
            timesteps: self.time_axis.len(),
            points: self.points,
            time_start: self.time_axis.values().first().copied(),
            time_end: self.time_axis.values().last().copied(),
            time_units: self.time_axis.units().map(|u| u.to_string()),
            features_per_timestep: self.collections.iter().map(FeatureCollection::len).collect(),
        }
    }
}
