//! Individual MAT variable representation.
//!
//! [`MatData`] represents a single numeric variable from a MAT file,
//! providing access to its data as ndarray arrays.

use matfile::{Array as MatArray, NumericData};
use ndarray::{Array1, Array2, ShapeBuilder};

use crate::error::{Error, Result};

/// Widen any of matfile's integer/float payloads into f64.
macro_rules! widen {
    ($real:expr) => {
        $real.iter().map(|&x| x as f64).collect::<Vec<f64>>()
    };
}

/// A numeric variable from a MAT file.
///
/// `MatData` wraps a single variable, providing shape information and data
/// access as 1-D or 2-D arrays. All numeric types are widened to `f64`.
///
/// # Data Layout
///
/// MATLAB stores arrays in column-major (Fortran) order; the payload is kept
/// that way and [`MatData::to_array2`] accounts for it, so `array[[r, c]]`
/// matches MATLAB's `var(r+1, c+1)`.
///
/// # Example
///
/// ```
/// use barsed::mat::MatData;
///
/// let eta = MatData::from_vec("eta_wm", vec![0.0, 0.1, 0.05]);
/// assert_eq!(eta.shape(), &[3]);
/// assert!(eta.is_1d());
/// ```
#[derive(Debug, Clone)]
pub struct MatData {
    /// Variable name.
    name: String,

    /// Shape of the array.
    shape: Vec<usize>,

    /// Payload in MATLAB column-major order.
    data: Vec<f64>,
}

impl MatData {
    /// Create a variable from an explicit shape and column-major payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the shape does not describe
    /// exactly `data.len()` elements.
    pub fn new(name: impl Into<String>, shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let name = name.into();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::invalid_format(format!(
                "Variable '{}': shape {:?} describes {} elements but {} were supplied",
                name,
                shape,
                expected,
                data.len()
            )));
        }
        Ok(MatData { name, shape, data })
    }

    /// Create a 1-D variable from a vector.
    pub fn from_vec(name: impl Into<String>, data: Vec<f64>) -> Self {
        let shape = vec![data.len()];
        MatData {
            name: name.into(),
            shape,
            data,
        }
    }

    /// Create a 2-D variable from a row-major ndarray.
    pub fn from_array2(name: impl Into<String>, array: &Array2<f64>) -> Self {
        let (rows, cols) = array.dim();
        // Transposed row-major iteration yields the column-major payload.
        let data: Vec<f64> = array.t().iter().copied().collect();
        MatData {
            name: name.into(),
            shape: vec![rows, cols],
            data,
        }
    }

    /// Create MatData from a matfile Array.
    pub(crate) fn from_matfile_array(array: &MatArray) -> Result<Self> {
        let name = array.name().to_string();
        let shape: Vec<usize> = array.size().iter().map(|&x| x as usize).collect();

        let (data, is_complex) = match array.data() {
            NumericData::Double { real, imag } => (real.clone(), imag.is_some()),
            NumericData::Single { real, imag } => (widen!(real), imag.is_some()),
            NumericData::Int8 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::Int16 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::Int32 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::Int64 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::UInt8 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::UInt16 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::UInt32 { real, imag } => (widen!(real), imag.is_some()),
            NumericData::UInt64 { real, imag } => (widen!(real), imag.is_some()),
        };

        if is_complex {
            // Flume instrument exports are real-valued; an imaginary part
            // means the wrong variable was requested.
            log::warn!("Variable '{}' is complex; imaginary part discarded", name);
        }

        MatData::new(name, shape, data)
    }

    /// Get the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the shape of the array.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Check if the array is 1-dimensional.
    ///
    /// MATLAB stores row vectors as `[1, N]` and column vectors as `[N, 1]`;
    /// this method returns true for both, as well as true 1-D arrays.
    pub fn is_1d(&self) -> bool {
        matches!(self.shape.as_slice(), [_] | [1, _] | [_, 1])
    }

    /// Check if the array is 2-dimensional.
    pub fn is_2d(&self) -> bool {
        self.shape.len() == 2
    }

    /// Get the total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the single element of a scalar variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the variable holds anything but
    /// exactly one element.
    pub fn scalar(&self) -> Result<f64> {
        if self.data.len() == 1 {
            Ok(self.data[0])
        } else {
            Err(Error::shape_mismatch(format!(
                "variable '{}': expected a scalar, found shape {:?}",
                self.name, self.shape
            )))
        }
    }

    /// Get the data as a 1-D array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the variable is not a vector.
    pub fn to_array1(&self) -> Result<Array1<f64>> {
        if !self.is_1d() {
            return Err(Error::shape_mismatch(format!(
                "variable '{}' is not 1-D (shape: {:?})",
                self.name, self.shape
            )));
        }
        Ok(Array1::from_vec(self.data.clone()))
    }

    /// Get the data as a 2-D array, handling MATLAB's column-major layout.
    ///
    /// A 1-D variable is treated as a single column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] for arrays of three or more
    /// dimensions.
    pub fn to_array2(&self) -> Result<Array2<f64>> {
        let (rows, cols) = self.dims_2d()?;

        Array2::from_shape_vec((rows, cols).f(), self.data.clone()).map_err(|e| {
            Error::shape_mismatch(format!("variable '{}': {}", self.name, e))
        })
    }

    /// Get 2-D dimensions, treating 1-D as `[N, 1]`.
    fn dims_2d(&self) -> Result<(usize, usize)> {
        match self.shape.as_slice() {
            [n] => Ok((*n, 1)),
            [r, c] => Ok((*r, *c)),
            _ => Err(Error::shape_mismatch(format!(
                "variable '{}' is not 2-D (shape: {:?})",
                self.name, self.shape
            ))),
        }
    }

    /// Get the raw column-major data slice.
    pub fn raw_data(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_bad_shape() {
        let result = MatData::new("x", vec![2, 3], vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_vec_is_1d() {
        let v = MatData::from_vec("t", vec![0.0, 1.0, 2.0]);
        assert!(v.is_1d());
        assert_eq!(v.to_array1().unwrap().len(), 3);
    }

    #[test]
    fn test_scalar() {
        let s = MatData::from_vec("per", vec![7.0]);
        assert_eq!(s.scalar().unwrap(), 7.0);

        let v = MatData::from_vec("per", vec![7.0, 8.0]);
        assert!(v.scalar().is_err());
    }

    #[test]
    fn test_column_major_round_trip() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let data = MatData::from_array2("eta", &a);
        assert_eq!(data.shape(), &[2, 3]);

        let back = data.to_array2().unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_to_array2_from_vector() {
        let v = MatData::from_vec("x", vec![1.0, 2.0]);
        let a = v.to_array2().unwrap();
        assert_eq!(a.dim(), (2, 1));
    }
}
