//! Raw variables as read from the dataset file.

use crate::error::{EddyError, Result};
use ndarray::{Array1, ArrayD, IxDyn};
use std::collections::HashMap;

/// A named numeric variable, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct RawVariable {
    /// Variable name.
    pub name: String,
    /// Declared shape.
    pub shape: Vec<usize>,
    /// Dimension names.
    pub dim_names: Vec<String>,
    /// Declared data type, lowercased (e.g. `float(f32)`).
    pub dtype: String,
    /// Variable attributes rendered as strings.
    pub attributes: HashMap<String, String>,
    /// Values as f64 with packing applied and fill values replaced by NaN.
    pub data: ArrayD<f64>,
}

impl RawVariable {
    /// Build a variable from already-decoded values.
    ///
    /// Fails with a shape mismatch when `values` does not fill `shape`.
    pub fn from_values(name: impl Into<String>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        let expected = shape.iter().product();
        let actual = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|_| EddyError::shape_mismatch(name.clone(), expected, actual))?;

        Ok(Self {
            dim_names: (0..shape.len()).map(|i| format!("dim_{}", i)).collect(),
            name,
            shape,
            dtype: "float(f64)".to_string(),
            attributes: HashMap::new(),
            data,
        })
    }

    /// Build a one-dimensional variable.
    pub fn from_vec(name: impl Into<String>, values: Vec<f64>) -> Self {
        let len = values.len();
        let name = name.into();
        Self {
            dim_names: vec![format!("{}_dim", name)],
            name,
            shape: vec![len],
            dtype: "float(f64)".to_string(),
            attributes: HashMap::new(),
            data: Array1::from(values).into_dyn(),
        }
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the variable holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values flattened in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Count of non-NaN values.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }
}
