//! NetCDF fixtures for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TIMES: [f64; 3] = [0.0, 6.0, 12.0];
pub const LATS: [f64; 4] = [40.0, 41.0, 42.0, 43.0];
pub const LONS: [f64; 4] = [-70.0, -69.0, -68.0, -67.0];

/// Packed eastward velocity (scale 0.01, fill -32767), shaped (time, point).
const U_PACKED: [i16; 12] = [
    300, 0, 100, -32767, //
    0, 0, 0, 0, //
    -100, 0, 0, 0,
];

/// Northward velocity in m/s, shaped (time, point).
const V: [f64; 12] = [
    4.0, 0.0, 0.0, 1.0, //
    1.0, 1.0, 1.0, 1.0, //
    0.0, -1.0, 0.0, 0.0,
];

/// Northward velocity packed with an offset and two missing-value markers.
const V_OFFSET_PACKED: [i16; 12] = [
    4, -999, -9999, 1, //
    1, 1, 1, 1, //
    0, -2, 0, 0,
];

#[derive(Debug, Default)]
pub struct Options<'a> {
    /// Variables left out of the file.
    pub skip: &'a [&'a str],
    /// Store `u` as a flat 1-D float array of this many elements instead.
    pub flat_u_len: Option<usize>,
    /// Also write `v_offset` (i16, `add_offset` 0.5, vector `missing_value`)
    /// and `u_text` (string type, not decodable as numbers).
    pub alternates: bool,
}

/// Write the standard three-timestep, four-point fixture.
pub fn write_currents(dir: &Path) -> PathBuf {
    write_with(dir, "currents.nc", Options::default())
}

pub fn write_with(dir: &Path, name: &str, options: Options<'_>) -> PathBuf {
    let path = dir.join(name);
    let mut file = netcdf::create(&path).expect("create fixture");

    file.add_dimension("time", TIMES.len()).unwrap();
    file.add_dimension("point", LATS.len()).unwrap();

    let keep = |var: &str| !options.skip.contains(&var);

    if keep("time") {
        let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
        var.put_attribute("units", "hours since 2024-01-01 00:00:00").unwrap();
        var.put_values(&TIMES[..], ..).unwrap();
    }
    if keep("latitude") {
        let mut var = file.add_variable::<f64>("latitude", &["point"]).unwrap();
        var.put_values(&LATS[..], ..).unwrap();
    }
    if keep("longitude") {
        let mut var = file.add_variable::<f32>("longitude", &["point"]).unwrap();
        let lons: Vec<f32> = LONS.iter().map(|&x| x as f32).collect();
        var.put_values(&lons[..], ..).unwrap();
    }
    if keep("u") {
        match options.flat_u_len {
            Some(len) => {
                file.add_dimension("flat", len).unwrap();
                let mut var = file.add_variable::<f64>("u", &["flat"]).unwrap();
                var.put_values(&vec![0.5; len][..], ..).unwrap();
            }
            None => {
                let mut var = file.add_variable::<i16>("u", &["time", "point"]).unwrap();
                var.put_attribute("_FillValue", -32767i16).unwrap();
                var.put_attribute("scale_factor", 0.01f64).unwrap();
                var.put_values(&U_PACKED[..], ..).unwrap();
            }
        }
    }
    if keep("v") {
        let mut var = file.add_variable::<f64>("v", &["time", "point"]).unwrap();
        var.put_attribute("units", "m s-1").unwrap();
        var.put_values(&V[..], ..).unwrap();
    }

    if options.alternates {
        let mut var = file.add_variable::<i16>("v_offset", &["time", "point"]).unwrap();
        var.put_attribute("missing_value", vec![-999i16, -9999i16]).unwrap();
        var.put_attribute("add_offset", 0.5f64).unwrap();
        var.put_values(&V_OFFSET_PACKED[..], ..).unwrap();

        file.add_string_variable("u_text", &["time", "point"]).unwrap();
    }

    path
}

pub fn tempdir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}
