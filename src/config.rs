//! Dataset configuration.

/// Meters per second to knots.
pub const MS_TO_KNOTS: f64 = 1.94384;

/// Names of the variables read from the dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNames {
    /// Eastward velocity component (m/s).
    pub u: String,
    /// Northward velocity component (m/s).
    pub v: String,
    /// Time axis.
    pub time: String,
    /// Latitude per spatial index.
    pub latitude: String,
    /// Longitude per spatial index.
    pub longitude: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            u: "u".to_string(),
            v: "v".to_string(),
            time: "time".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}
