//! Wire/boundary support for the SCLC advisor.
//!
//! This crate provides **wire models** and **format/translation helpers** for the hosts around
//! the decision core:
//! - the string-typed form record collected by a UI, CLI or API request
//! - YAML and JSON patient record files
//! - rendered recommendation reports
//!
//! The core crate never parses text; everything that arrives as text is validated here and
//! handed over as typed domain values.

pub mod form;
pub mod record_file;
pub mod report;

// Re-export facades
pub use record_file::RecordFile;
pub use report::Report;

// Re-export public wire-level types
pub use form::{parse_g8_answers, FormRecord, FormTnm};
pub use report::ReportFormat;

/// Errors returned by the `sclc-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

impl WireError {
    pub(crate) fn field(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        WireError::InvalidField {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;
