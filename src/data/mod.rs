//! Raw data loading.
//!
//! This module reads the velocity components, time axis and coordinates
//! out of a netCDF file, applying CF packing and fill-value conventions.

mod loader;
mod time_units;
mod variable;

pub use loader::{load, RawVariables};
pub use time_units::{parse_datetime, TimeUnit, TimeUnits};
pub use variable::RawVariable;
