//! Error types for BarSed data loading.
//!
//! This module provides the [`Error`] enum covering the failure modes of
//! MAT-file unpacking and run assembly, along with a convenient [`Result`]
//! type alias.

use std::io;
use thiserror::Error;

/// Result type alias for BarSed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or deriving run data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a valid MAT file or has a corrupted payload.
    #[error("Invalid MAT file format: {reason}")]
    InvalidFormat {
        /// Description of the format error.
        reason: String,
    },

    /// A required variable or struct field was not present.
    #[error("Variable '{name}' not found in {source_label}")]
    MissingVariable {
        /// Name of the missing variable or field.
        name: String,
        /// Where the variable was looked up (file path or struct label).
        source_label: String,
    },

    /// A variable was present but held the wrong kind of value.
    #[error("Variable '{name}' is {found}, expected {expected}")]
    VariableKind {
        /// Name of the offending variable or field.
        name: String,
        /// The kind the caller required.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },

    /// Source data did not match the documented layout.
    #[error("Shape mismatch: {context}")]
    ShapeMismatch {
        /// Description of what was expected and what was found.
        context: String,
    },

    /// A wave gauge id outside the fixed hardware table (1..=17).
    #[error("Wave gauge id {id} has no entry in the gauge type table (valid ids: 1..=17)")]
    UnknownGaugeId {
        /// The offending gauge id.
        id: u32,
    },

    /// One or more velocity-component names outside the canonical set.
    #[error("Unknown velocity key(s): [{invalid}]; valid keys are: [{valid}]")]
    UnknownVelocityKeys {
        /// Comma-joined invalid names, in input order.
        invalid: String,
        /// Comma-joined canonical key names.
        valid: String,
    },

    /// Mask length does not match the list it is applied to.
    #[error("Mask length {mask_len} does not match list length {list_len}")]
    MaskLengthMismatch {
        /// Length of the boolean mask.
        mask_len: usize,
        /// Length of the list being masked.
        list_len: usize,
    },

    /// Invalid moving-average window for the given series.
    #[error("Window size {window} is invalid for a series of length {len} (must be 1..=len)")]
    InvalidWindow {
        /// Requested window size.
        window: usize,
        /// Length of the series.
        len: usize,
    },

    /// An operation needed data that has not been loaded yet.
    #[error("Missing data: {what}")]
    MissingData {
        /// What was required and absent.
        what: &'static str,
    },

    /// The caller-supplied site labels do not cover the pressure records.
    #[error("Got {labels} site label(s) for {records} pressure record(s); counts must match")]
    SiteCountMismatch {
        /// Number of caller-supplied site labels.
        labels: usize,
        /// Number of per-site records in the file.
        records: usize,
    },

    /// A MATLAB datenum outside the representable calendar range.
    #[error("Datenum {datenum} is outside the representable calendar range")]
    DatenumOutOfRange {
        /// The offending serial date number.
        datenum: f64,
    },

    /// Failure from the plotting backend.
    #[error("Plot error: {message}")]
    Plot {
        /// Backend error description.
        message: String,
    },
}

impl Error {
    /// Create an InvalidFormat error with the given reason.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat { reason: reason.into() }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self::MissingVariable {
            name: name.into(),
            source_label: source_label.into(),
        }
    }

    /// Create a VariableKind error.
    pub fn variable_kind(
        name: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::VariableKind {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(context: impl Into<String>) -> Self {
        Self::ShapeMismatch { context: context.into() }
    }

    /// Create an UnknownGaugeId error.
    pub const fn unknown_gauge_id(id: u32) -> Self {
        Self::UnknownGaugeId { id }
    }

    /// Create an UnknownVelocityKeys error from the offending names.
    pub fn unknown_velocity_keys<S: AsRef<str>>(invalid: &[S]) -> Self {
        let invalid = invalid
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        let valid = crate::adv::VelocityKey::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownVelocityKeys { invalid, valid }
    }

    /// Create a MissingData error.
    pub const fn missing_data(what: &'static str) -> Self {
        Self::MissingData { what }
    }

    /// Create a Plot error.
    pub fn plot(message: impl Into<String>) -> Self {
        Self::Plot { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unknown_gauge_id(42);
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("1..=17"));

        let err = Error::variable_kind("eta", "numeric array", "struct");
        assert!(err.to_string().contains("eta"));
        assert!(err.to_string().contains("numeric array"));
    }

    #[test]
    fn test_unknown_velocity_keys_names_offenders() {
        let err = Error::unknown_velocity_keys(&["u_bogus", "w_bad"]);
        let msg = err.to_string();
        assert!(msg.contains("u_bogus"));
        assert!(msg.contains("w_bad"));
        assert!(msg.contains("u_ens_avg"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
