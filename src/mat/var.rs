//! Nested MAT value trees.
//!
//! BarSed exports are MATLAB struct arrays: a top-level struct (`eta`,
//! `adv`) or an array of per-site records (`p0`), each field holding numeric
//! arrays, strings, or further nesting. [`MatVar`] models one value in that
//! tree and [`MatStruct`] models a named field map, with `require_*`
//! accessors that fail fast with a descriptive error when the nesting does
//! not match the documented layout.

use std::collections::HashMap;

use crate::error::{Error, Result};
use super::data::MatData;

/// One value in a MAT variable tree.
#[derive(Debug, Clone)]
pub enum MatVar {
    /// A numeric array.
    Array(MatData),

    /// A character/cellstr variable, one string per element.
    Text(Vec<String>),

    /// A scalar struct: named fields.
    Struct(MatStruct),

    /// A cell or struct array: ordered elements of any kind.
    Cells(Vec<MatVar>),
}

impl MatVar {
    /// Human-readable kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MatVar::Array(_) => "numeric array",
            MatVar::Text(_) => "text",
            MatVar::Struct(_) => "struct",
            MatVar::Cells(_) => "cell array",
        }
    }

    /// Get the numeric array, if this value is one.
    pub fn as_array(&self) -> Option<&MatData> {
        match self {
            MatVar::Array(data) => Some(data),
            _ => None,
        }
    }

    /// Get the text entries, if this value is text.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            MatVar::Text(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get the struct fields, if this value is a scalar struct.
    pub fn as_struct(&self) -> Option<&MatStruct> {
        match self {
            MatVar::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get the elements, if this value is a cell/struct array.
    pub fn as_cells(&self) -> Option<&[MatVar]> {
        match self {
            MatVar::Cells(elements) => Some(elements),
            _ => None,
        }
    }
}

/// A named field map: one MATLAB struct, or the top level of a MAT file.
///
/// # Example
///
/// ```
/// use barsed::mat::{MatData, MatStruct, MatVar};
///
/// let mut fields = MatStruct::new();
/// fields.insert("x_wm", MatVar::Array(MatData::from_vec("x_wm", vec![0.0, 0.2])));
///
/// let x_wm = fields.require_array("x_wm")?;
/// assert_eq!(x_wm.len(), 2);
/// # Ok::<(), barsed::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatStruct {
    /// Fields keyed by name.
    fields: HashMap<String, MatVar>,
}

impl MatStruct {
    /// Create an empty struct.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, value: MatVar) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&MatVar> {
        self.fields.get(name)
    }

    /// Get a field by name, or fail naming the missing field.
    pub fn require(&self, name: &str) -> Result<&MatVar> {
        self.get(name)
            .ok_or_else(|| Error::missing_variable(name, "struct"))
    }

    /// Get a field as a numeric array, failing on absence or wrong kind.
    pub fn require_array(&self, name: &str) -> Result<&MatData> {
        let var = self.require(name)?;
        var.as_array()
            .ok_or_else(|| Error::variable_kind(name, "numeric array", var.kind_name()))
    }

    /// Get a field as text entries, failing on absence or wrong kind.
    pub fn require_text(&self, name: &str) -> Result<&[String]> {
        let var = self.require(name)?;
        var.as_text()
            .ok_or_else(|| Error::variable_kind(name, "text", var.kind_name()))
    }

    /// Get a field as a scalar struct, failing on absence or wrong kind.
    pub fn require_struct(&self, name: &str) -> Result<&MatStruct> {
        let var = self.require(name)?;
        var.as_struct()
            .ok_or_else(|| Error::variable_kind(name, "struct", var.kind_name()))
    }

    /// Get a field as a cell/struct array, failing on absence or wrong kind.
    pub fn require_cells(&self, name: &str) -> Result<&[MatVar]> {
        let var = self.require(name)?;
        var.as_cells()
            .ok_or_else(|| Error::variable_kind(name, "cell array", var.kind_name()))
    }

    /// Get a field as a scalar value, failing on absence or wrong shape.
    pub fn require_scalar(&self, name: &str) -> Result<f64> {
        self.require_array(name)?.scalar()
    }

    /// Iterate over field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Iterate over fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatVar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MatStruct {
        let mut s = MatStruct::new();
        s.insert("date", MatVar::Array(MatData::from_vec("date", vec![739435.5])));
        s.insert("names", MatVar::Text(vec!["adv1".to_string()]));
        s.insert("nested", MatVar::Struct(MatStruct::new()));
        s
    }

    #[test]
    fn test_require_missing_field() {
        let s = sample();
        let err = s.require("absent").unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_require_wrong_kind_names_both_kinds() {
        let s = sample();
        let err = s.require_array("names").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("names"));
        assert!(msg.contains("numeric array"));
        assert!(msg.contains("text"));
    }

    #[test]
    fn test_require_accessors() {
        let s = sample();
        assert_eq!(s.require_array("date").unwrap().len(), 1);
        assert_eq!(s.require_scalar("date").unwrap(), 739435.5);
        assert_eq!(s.require_text("names").unwrap().len(), 1);
        assert!(s.require_struct("nested").unwrap().is_empty());
        assert!(s.require_cells("date").is_err());
    }
}
