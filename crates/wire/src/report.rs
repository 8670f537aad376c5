//! Rendered recommendation reports.

use std::fmt::Write as _;
use std::str::FromStr;

use sclc_core::{AdvisorService, OverallStage, PatientRecord, Recommendation, TnmResult};
use sclc_types::{format_points, G8_MAX_POINTS};
use serde::Serialize;

use crate::{WireError, WireResult};

/// Output format for a [`Report`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Yaml,
    Json,
}

impl FromStr for ReportFormat {
    type Err = WireError;

    fn from_str(s: &str) -> WireResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "json" => Ok(ReportFormat::Json),
            other => Err(WireError::InvalidInput(format!(
                "unknown report format '{other}'"
            ))),
        }
    }
}

/// Recommendations for one patient together with the derived values they were based on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub effective_stage: Option<OverallStage>,
    pub g8_score: Option<f64>,
    pub g8_complete: bool,
    pub tnm: Option<TnmResult>,
    pub recommendations: Vec<Recommendation>,
}

impl Report {
    /// Runs the rule engine over `record` and captures the result.
    pub fn generate(record: &PatientRecord) -> Self {
        let recommendations = AdvisorService::new().generate_recommendations(record);
        Self::new(record, recommendations)
    }

    pub fn new(record: &PatientRecord, recommendations: Vec<Recommendation>) -> Self {
        Self {
            effective_stage: record.effective_stage(),
            g8_score: record.frailty().score(),
            g8_complete: record.is_g8_complete(),
            tnm: record.tnm_result,
            recommendations,
        }
    }

    pub fn render(&self, format: ReportFormat) -> WireResult<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Yaml => self.render_yaml(),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn render_yaml(&self) -> WireResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| WireError::Translation(format!("Failed to serialise report: {e}")))
    }

    pub fn render_json(&self) -> WireResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| WireError::Translation(format!("Failed to serialise report: {e}")))
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let stage = self
            .effective_stage
            .map_or("not provided", OverallStage::label);
        let _ = writeln!(out, "Stage: {stage}");
        if let Some(tnm) = &self.tnm {
            let _ = writeln!(
                out,
                "TNM: {} {} {} -> {}",
                tnm.t,
                tnm.n,
                tnm.m,
                if tnm.stage.label().is_empty() {
                    "unassigned"
                } else {
                    tnm.stage.label()
                }
            );
        }
        match self.g8_score {
            Some(score) => {
                let _ = writeln!(
                    out,
                    "G8: {}/{}{}",
                    format_points(score),
                    format_points(G8_MAX_POINTS),
                    if self.g8_complete { "" } else { " (incomplete)" }
                );
            }
            None => {
                let _ = writeln!(out, "G8: not calculated");
            }
        }

        for rec in &self.recommendations {
            let _ = writeln!(out, "\n[{}] {}", rec.severity, rec.category);
            let _ = writeln!(out, "  {}", rec.text);
        }

        out
    }
}
