//! NetCDF dataset loader.

use super::RawVariable;
use crate::config::VariableNames;
use crate::error::{EddyError, Result};
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// The five variables a current dataset is built from.
#[derive(Debug, Clone)]
pub struct RawVariables {
    /// Eastward velocity, flattened over (time, spatial index).
    pub u: RawVariable,
    /// Northward velocity, flattened over (time, spatial index).
    pub v: RawVariable,
    /// Time axis.
    pub time: RawVariable,
    /// Latitude per spatial index.
    pub latitude: RawVariable,
    /// Longitude per spatial index.
    pub longitude: RawVariable,
}

/// Open a dataset file and read the required variables.
///
/// Fails with [`EddyError::FileOpen`] if the path cannot be accessed, with
/// [`EddyError::NetCDF`] if it is not a readable netCDF file, and with
/// [`EddyError::MissingVariable`] naming the first absent variable.
pub fn load(path: &Path, names: &VariableNames) -> Result<RawVariables> {
    std::fs::metadata(path).map_err(|e| EddyError::file_open(path.to_path_buf(), e))?;
    let file = netcdf::open(path)?;

    let u = read_variable(&file, &names.u)?;
    let v = read_variable(&file, &names.v)?;
    let time = read_variable(&file, &names.time)?;
    let latitude = read_variable(&file, &names.latitude)?;
    let longitude = read_variable(&file, &names.longitude)?;

    if latitude.len() != longitude.len() {
        return Err(EddyError::shape_mismatch(
            format!("{}/{}", names.latitude, names.longitude),
            latitude.len(),
            longitude.len(),
        ));
    }

    info!(
        path = %path.display(),
        timesteps = time.len(),
        points = latitude.len(),
        "Loaded raw variables"
    );

    Ok(RawVariables {
        u,
        v,
        time,
        latitude,
        longitude,
    })
}

fn read_variable(file: &netcdf::File, name: &str) -> Result<RawVariable> {
    let var = file
        .variable(name)
        .ok_or_else(|| EddyError::missing_variable(name))?;

    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();

    let mut attributes = HashMap::new();
    let mut numeric = HashMap::new();
    for attr in var.attributes() {
        let key = attr.name().to_string();
        let value = attr.value()?;
        let values = attr_as_f64s(&value);
        if !values.is_empty() {
            numeric.insert(key.clone(), values);
        }
        attributes.insert(key, attr_value_to_string(value));
    }

    let dtype = format!("{:?}", var.vartype()).replace("NcVariableType::", "").to_lowercase();
    let mut data = read_variable_array(&var, name, &shape)?;

    // Fill values are compared against the packed data, before scale/offset.
    let fill_values: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|k| numeric.get(*k))
        .flatten()
        .copied()
        .collect();
    if !fill_values.is_empty() {
        data.mapv_inplace(|x| if fill_values.contains(&x) { f64::NAN } else { x });
    }

    // CF packing
    let scale_factor = first_numeric(&numeric, "scale_factor").unwrap_or(1.0);
    let add_offset = first_numeric(&numeric, "add_offset").unwrap_or(0.0);
    if scale_factor != 1.0 || add_offset != 0.0 {
        data.mapv_inplace(|x| x * scale_factor + add_offset);
    }

    debug!(
        variable = name,
        shape = ?shape,
        dtype = %dtype,
        fill_values = fill_values.len(),
        "Read variable"
    );

    Ok(RawVariable {
        name: name.to_string(),
        shape,
        dim_names,
        dtype,
        attributes,
        data,
    })
}

fn read_variable_array(var: &netcdf::Variable<'_>, name: &str, shape: &[usize]) -> Result<ArrayD<f64>> {
    let vartype = var.vartype();

    let from_vec = |v: Vec<f64>| -> Result<ArrayD<f64>> {
        let actual = v.len();
        ArrayD::from_shape_vec(IxDyn(shape), v)
            .map_err(|_| EddyError::shape_mismatch(name, shape.iter().product(), actual))
    };

    macro_rules! read_as {
        ($t:ty) => {{
            let values: Vec<$t> = var.get_values(..)?;
            from_vec(values.into_iter().map(|x| x as f64).collect())
        }};
    }

    match vartype {
        NcVariableType::Float(FloatType::F64) => {
            let values: Vec<f64> = var.get_values(..)?;
            from_vec(values)
        }
        NcVariableType::Float(FloatType::F32) => read_as!(f32),
        NcVariableType::Int(IntType::I64) => read_as!(i64),
        NcVariableType::Int(IntType::I32) => read_as!(i32),
        NcVariableType::Int(IntType::I16) => read_as!(i16),
        NcVariableType::Int(IntType::I8) => read_as!(i8),
        NcVariableType::Int(IntType::U64) => read_as!(u64),
        NcVariableType::Int(IntType::U32) => read_as!(u32),
        NcVariableType::Int(IntType::U16) => read_as!(u16),
        NcVariableType::Int(IntType::U8) => read_as!(u8),
        other => Err(EddyError::UnsupportedType {
            name: name.to_string(),
            dtype: format!("{:?}", other),
        }),
    }
}

fn first_numeric(numeric: &HashMap<String, Vec<f64>>, key: &str) -> Option<f64> {
    numeric.get(key).and_then(|v| v.first()).copied()
}

/// Every element of a numeric attribute as f64. Text attributes yield nothing.
fn attr_as_f64s(value: &AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Uchar(v) => vec![*v as f64],
        AttributeValue::Schar(v) => vec![*v as f64],
        AttributeValue::Ushort(v) => vec![*v as f64],
        AttributeValue::Short(v) => vec![*v as f64],
        AttributeValue::Uint(v) => vec![*v as f64],
        AttributeValue::Int(v) => vec![*v as f64],
        AttributeValue::Ulonglong(v) => vec![*v as f64],
        AttributeValue::Longlong(v) => vec![*v as f64],
        AttributeValue::Float(v) => vec![*v as f64],
        AttributeValue::Double(v) => vec![*v],
        AttributeValue::Uchars(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Schars(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Ushorts(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Shorts(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Uints(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Ints(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Ulonglongs(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Longlongs(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Floats(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Doubles(v) => v.clone(),
        _ => Vec::new(),
    }
}

fn attr_value_to_string(value: AttributeValue) -> String {
    match value {
        AttributeValue::Uchar(v) => format!("{}", v),
        AttributeValue::Schar(v) => format!("{}", v),
        AttributeValue::Ushort(v) => format!("{}", v),
        AttributeValue::Short(v) => format!("{}", v),
        AttributeValue::Uint(v) => format!("{}", v),
        AttributeValue::Int(v) => format!("{}", v),
        AttributeValue::Ulonglong(v) => format!("{}", v),
        AttributeValue::Longlong(v) => format!("{}", v),
        AttributeValue::Float(v) => format!("{}", v),
        AttributeValue::Double(v) => format!("{}", v),
        AttributeValue::Str(v) => v,
        AttributeValue::Strs(v) => v.join(", "),
        other => format!("{:?}", other),
    }
}
