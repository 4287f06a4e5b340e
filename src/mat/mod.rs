//! MAT file support for the BarSed instrument exports.
//!
//! This module is the "nested dictionary of arrays" layer the run loaders
//! consume. The main types are:
//!
//! - [`MatSource`] — loads and provides access to MAT variables
//! - [`MatData`] — one numeric variable
//! - [`MatVar`] / [`MatStruct`] — the nested value tree (struct arrays,
//!   cell arrays, text)
//!
//! # Overview
//!
//! ```no_run
//! use barsed::mat::MatSource;
//!
//! let source = MatSource::open("RUN001_waves.mat")?;
//!
//! for name in source.variable_names() {
//!     println!("Variable: {}", name);
//! }
//!
//! let eta = source.require("eta")?;
//! println!("eta is {}", eta.kind_name());
//! # Ok::<(), barsed::Error>(())
//! ```
//!
//! # Supported MAT Formats
//!
//! - Level 5 MAT files (MATLAB v5, v6, v7), v7 compressed
//! - Numeric arrays of any type (widened to f64)
//! - Nested struct/cell layouts via [`MatSource::from_struct`]
//!
//! # Not Supported
//!
//! - HDF5-based v7.3 files (use the `hdf5` crate directly)
//! - Sparse matrices, function handles, objects

mod data;
mod file;
mod var;

// Re-exports
pub use data::MatData;
pub use file::MatSource;
pub use var::{MatStruct, MatVar};
