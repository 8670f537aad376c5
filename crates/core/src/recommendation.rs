//! Recommendation output types.

use serde::{Deserialize, Serialize};

/// How a recommendation should be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational guidance.
    Info,
    /// Reassuring or standard-of-care guidance.
    Success,
    /// Requires caution or escalation.
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single categorised recommendation.
///
/// Recommendations carry no identity beyond their position in the generated sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    /// Short grouping label.
    pub category: String,
    /// Full recommendation body.
    pub text: String,
}

impl Recommendation {
    pub fn new(severity: Severity, category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            text: text.into(),
        }
    }

    pub fn info(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, text)
    }

    pub fn success(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Success, category, text)
    }

    pub fn warning(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, text)
    }
}
