//! Constants used throughout the SCLC core crate.
//!
//! This module contains the protocol thresholds so that every rule compares against the same
//! values.

/// G8 scores at or below this value flag the patient as frail.
pub const G8_FRAILTY_CUTOFF: f64 = 14.0;

/// Age (years) from which a geriatric assessment is expected.
pub const GERIATRIC_AGE: u32 = 70;

/// Age (years) from which concurrent chemoradiation is adapted regardless of fitness.
pub const ADVANCED_AGE: u32 = 75;

/// Metastatic first line is adapted above this performance status.
pub const METASTATIC_MAX_PS: u8 = 2;

/// Concurrent chemoradiation and prophylactic cranial irradiation require PS at or below this.
pub const CURATIVE_MAX_PS: u8 = 1;

/// Stage label used when T, N or M could not be resolved.
pub const INCOMPLETE_STAGE_LABEL: &str = "Incomplete";
