//! Speed and bearing derivation from velocity components.
//!
//! Each (north, east) pair is treated as the complex number `north + i·east`.
//! Its modulus is the speed and its argument is the bearing measured
//! clockwise from true north, so 0° is north and 90° is east.

use crate::config::MS_TO_KNOTS;
use crate::error::{EddyError, Result};
use ndarray::{Array2, Zip};
use num_complex::Complex64;

/// Speed (knots) and bearing (degrees in [0, 360)), both shaped (T, N).
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedField {
    /// Speed in knots.
    pub speed: Array2<f64>,
    /// Bearing in degrees clockwise from north.
    pub bearing: Array2<f64>,
}

impl DerivedField {
    /// Number of timesteps.
    pub fn timesteps(&self) -> usize {
        self.speed.nrows()
    }

    /// Number of spatial points per timestep.
    pub fn points(&self) -> usize {
        self.speed.ncols()
    }
}

/// Partition a flat array into `time_len` rows of equal length.
pub fn reshape(name: &str, values: Vec<f64>, time_len: usize) -> Result<Array2<f64>> {
    if time_len == 0 {
        return Err(EddyError::shape_mismatch(
            format!("{} (empty time axis)", name),
            1,
            0,
        ));
    }
    let total = values.len();
    if total % time_len != 0 {
        return Err(EddyError::shape_mismatch(
            format!("{} (not divisible by time axis length)", name),
            time_len,
            total,
        ));
    }

    Array2::from_shape_vec((time_len, total / time_len), values)
        .map_err(|_| EddyError::shape_mismatch(name, total, total))
}

/// Map an angle in (-180, 180] degrees into [0, 360).
pub fn normalize_bearing(degrees: f64) -> f64 {
    let wrapped = if degrees < 0.0 { degrees + 360.0 } else { degrees };
    // A tiny negative angle rounds up to exactly 360 after wrapping.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Derive speed and bearing from flat eastward (`u`) and northward (`v`)
/// velocity arrays in meters per second.
pub fn derive(u: Vec<f64>, v: Vec<f64>, time_len: usize) -> Result<DerivedField> {
    if u.len() != v.len() {
        return Err(EddyError::shape_mismatch("u/v", u.len(), v.len()));
    }
    let east = reshape("u", u, time_len)?;
    let north = reshape("v", v, time_len)?;

    let vectors = Zip::from(&north)
        .and(&east)
        .map_collect(|&n, &e| Complex64::new(n, e));

    Ok(DerivedField {
        speed: vectors.mapv(|c| c.norm() * MS_TO_KNOTS),
        bearing: vectors.mapv(|c| normalize_bearing(c.arg().to_degrees())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(u: f64, v: f64) -> (f64, f64) {
        let field = derive(vec![u], vec![v], 1).unwrap();
        (field.speed[[0, 0]], field.bearing[[0, 0]])
    }

    #[test]
    fn three_four_five() {
        let (speed, bearing) = single(3.0, 4.0);
        assert!((speed - 5.0 * 1.94384).abs() < 1e-9);
        assert!((bearing - 36.869_897_645_844).abs() < 1e-9);
    }

    #[test]
    fn compass_points() {
        assert_eq!(single(0.0, 1.0).1, 0.0);
        assert!((single(1.0, 0.0).1 - 90.0).abs() < 1e-12);
        assert!((single(0.0, -1.0).1 - 180.0).abs() < 1e-12);
        assert!((single(-1.0, 0.0).1 - 270.0).abs() < 1e-12);
    }

    #[test]
    fn westward_components_wrap_positive() {
        let (_, bearing) = single(-1.0, 1.0);
        assert!((bearing - 315.0).abs() < 1e-12);
    }

    #[test]
    fn bearing_always_in_range() {
        let mut u = Vec::new();
        let mut v = Vec::new();
        for i in -20..=20 {
            for j in -20..=20 {
                u.push(i as f64 * 0.1);
                v.push(j as f64 * 0.1);
            }
        }
        let field = derive(u, v, 41).unwrap();
        assert_eq!(field.timesteps(), 41);
        assert_eq!(field.points(), 41);
        assert!(field.bearing.iter().all(|&b| (0.0..360.0).contains(&b)));
    }

    #[test]
    fn tiny_negative_angle_does_not_reach_360() {
        assert_eq!(normalize_bearing(-1e-15), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(180.0), 180.0);
    }

    #[test]
    fn reshape_groups_by_timestep() {
        let rows = reshape("u", vec![1., 2., 3., 4., 5., 6.], 3).unwrap();
        assert_eq!(rows.dim(), (3, 2));
        assert_eq!(rows.row(1).to_vec(), vec![3., 4.]);
    }

    #[test]
    fn reshape_rejects_indivisible_length() {
        let err = reshape("u", vec![0.0; 7], 3).unwrap_err();
        assert!(matches!(
            err,
            EddyError::ShapeMismatch { expected: 3, actual: 7, .. }
        ));
        assert!(reshape("u", vec![0.0; 3], 0).is_err());
    }

    #[test]
    fn mismatched_components_fail() {
        assert!(matches!(
            derive(vec![0.0; 4], vec![0.0; 2], 2),
            Err(EddyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn nan_component_propagates() {
        let (speed, bearing) = single(f64::NAN, 1.0);
        assert!(speed.is_nan());
        assert!(bearing.is_nan());
    }
}
