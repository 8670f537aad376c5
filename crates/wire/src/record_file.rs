//! Patient record files (YAML or JSON).
//!
//! A record file is a serialised [`FormRecord`]. Unknown keys are rejected so that a misspelt
//! field cannot silently drop a clinical flag.

use std::path::Path;

use sclc_core::PatientRecord;

use crate::form::FormRecord;
use crate::{WireError, WireResult};

/// Record file operations.
///
/// This is a zero-sized type used for namespacing record file operations.
/// All methods are associated functions.
pub struct RecordFile;

impl RecordFile {
    /// Parse a patient record from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g. `tnm.nodes`) to the
    /// failing field when the YAML does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not represent a record mapping,
    /// - any unknown keys are present (due to `#[serde(deny_unknown_fields)]`),
    /// - a field value cannot be translated into the domain record.
    pub fn parse_yaml(yaml_text: &str) -> WireResult<PatientRecord> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let form = serde_path_to_error::deserialize::<_, FormRecord>(deserializer)
            .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))?;
        form.into_record()
    }

    /// Parse a patient record from JSON text.
    ///
    /// # Errors
    ///
    /// As for [`RecordFile::parse_yaml`].
    pub fn parse_json(json_text: &str) -> WireResult<PatientRecord> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let form = serde_path_to_error::deserialize::<_, FormRecord>(&mut deserializer)
            .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))?;
        deserializer.end()?;
        form.into_record()
    }

    /// Read a record file, choosing the format from the extension (`.yaml`, `.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidInput`] for any other extension, [`WireError::Io`] if the file
    /// cannot be read, and the parse errors above otherwise.
    pub fn read(path: &Path) -> WireResult<PatientRecord> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Self::parse_yaml(&std::fs::read_to_string(path)?),
            Some("json") => Self::parse_json(&std::fs::read_to_string(path)?),
            _ => Err(WireError::InvalidInput(format!(
                "unsupported record file '{}': expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }
}

fn schema_mismatch(path: String, source: impl std::fmt::Display) -> WireError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_owned()
    } else {
        path
    };
    WireError::Translation(format!("Record schema mismatch at {path}: {source}"))
}
