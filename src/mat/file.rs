//! MAT source loading and variable listing.
//!
//! This module provides [`MatSource`], the entry point for run data: a
//! named collection of [`MatVar`] values, either parsed from a `.mat` file
//! on disk or assembled in memory.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use matfile::MatFile as RawMatFile;

use crate::error::{Error, Result};
use super::data::MatData;
use super::var::{MatStruct, MatVar};

/// A loaded MAT data source.
///
/// # Supported Formats
///
/// [`MatSource::open`] reads Level 5 MAT files (MATLAB v5/v6/v7, including
/// zlib-compressed v7) through the `matfile` parser. That parser handles
/// numeric arrays only; struct arrays, cell arrays and char data are skipped
/// with a warning. Struct-organized exports should either be re-saved with
/// MATLAB's `save('file.mat', '-struct', 'eta')` (which flattens fields to
/// top-level variables — the layout the run loaders accept as a fallback),
/// or assembled with [`MatSource::from_struct`] by a reader that understands
/// the nesting.
///
/// # Unsupported
///
/// - Level 4 MAT files (legacy format)
/// - HDF5-based v7.3 files
///
/// # Example
///
/// ```no_run
/// use barsed::mat::MatSource;
///
/// let source = MatSource::open("RUN001_waves.mat")?;
/// println!("{}", source.describe());
/// # Ok::<(), barsed::Error>(())
/// ```
#[derive(Debug)]
pub struct MatSource {
    /// Top-level variables.
    vars: MatStruct,

    /// Original file path or in-memory label (for error messages).
    path: String,
}

impl MatSource {
    /// Open and parse a MAT file.
    ///
    /// Numeric variables become [`MatVar::Array`] entries; variables the
    /// parser cannot represent are skipped with a logged warning rather
    /// than failing the whole load.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file cannot be read
    /// - [`Error::InvalidFormat`] if the file is not a valid MAT file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let file = File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open MAT file '{}': {}", path_str, e),
            ))
        })?;

        let reader = BufReader::new(file);

        let mat_file = RawMatFile::parse(reader).map_err(|e| {
            Error::invalid_format(format!("Failed to parse MAT file '{}': {}", path_str, e))
        })?;

        let mut vars = MatStruct::new();

        for array in mat_file.arrays() {
            let name = array.name().to_string();

            match MatData::from_matfile_array(array) {
                Ok(data) => {
                    vars.insert(name, MatVar::Array(data));
                }
                Err(e) => {
                    log::warn!("Skipping variable '{}': {}", name, e);
                }
            }
        }

        Ok(MatSource {
            vars,
            path: path_str,
        })
    }

    /// Build a source from an in-memory variable tree.
    ///
    /// This is the entry point for struct-array layouts parsed by an
    /// external reader, and for tests.
    pub fn from_struct(vars: MatStruct, label: impl Into<String>) -> Self {
        MatSource {
            vars,
            path: label.into(),
        }
    }

    /// Get a top-level variable by name.
    pub fn get(&self, name: &str) -> Option<&MatVar> {
        self.vars.get(name)
    }

    /// Get a top-level variable, failing with the file path on absence.
    pub fn require(&self, name: &str) -> Result<&MatVar> {
        self.get(name)
            .ok_or_else(|| Error::missing_variable(name, self.path.clone()))
    }

    /// The top-level variables as a struct.
    pub fn vars(&self) -> &MatStruct {
        &self.vars
    }

    /// Get the names of all top-level variables.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.vars.field_names()
    }

    /// Get the number of top-level variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the source contains no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Get the file path or in-memory label.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get detailed information about all variables.
    ///
    /// Returns a formatted string describing each variable.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Variables in '{}':", self.path));
        lines.push(String::new());

        let mut names: Vec<_> = self.variable_names().collect();
        names.sort_unstable();

        let max_name_len = names.iter().map(|n| n.len()).max().unwrap_or(4);

        lines.push(format!(
            "  {:<width$}  {:>12}  {}",
            "Name",
            "Kind",
            "Shape",
            width = max_name_len
        ));

        for name in names {
            if let Some(var) = self.get(name) {
                let shape = match var {
                    MatVar::Array(data) => format!("{:?}", data.shape()),
                    MatVar::Text(entries) => format!("[{}]", entries.len()),
                    MatVar::Struct(fields) => format!("{} field(s)", fields.len()),
                    MatVar::Cells(elements) => format!("[{}]", elements.len()),
                };

                lines.push(format!(
                    "  {:<width$}  {:>12}  {}",
                    name,
                    var.kind_name(),
                    shape,
                    width = max_name_len
                ));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent() {
        let result = MatSource::open("/nonexistent/file.mat");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_struct_require() {
        let mut vars = MatStruct::new();
        vars.insert("x", MatVar::Array(MatData::from_vec("x", vec![1.0])));
        let source = MatSource::from_struct(vars, "in-memory");

        assert_eq!(source.len(), 1);
        assert!(source.require("x").is_ok());

        let err = source.require("y").unwrap_err();
        assert!(err.to_string().contains("in-memory"));
    }

    #[test]
    fn test_describe_lists_kinds() {
        let mut vars = MatStruct::new();
        vars.insert("eta", MatVar::Struct(MatStruct::new()));
        vars.insert("p0", MatVar::Cells(vec![]));
        let source = MatSource::from_struct(vars, "test");

        let description = source.describe();
        assert!(description.contains("struct"));
        assert!(description.contains("cell array"));
    }
}
