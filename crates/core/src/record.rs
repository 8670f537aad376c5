//! Patient record consumed by the decision core.
//!
//! A [`PatientRecord`] starts with every optional field unset and is filled in field by field as
//! the host collects data. The core never mutates it; derived values (a G8 total, a TNM result)
//! are returned to the host, which merges them back with the `apply_*` helpers below.

use std::str::FromStr;

use sclc_types::{G8Score, PerformanceStatus};
use serde::{Deserialize, Serialize};

use crate::frailty::{compute_frailty_score, G8Answers};
use crate::tnm::{classify_tnm, TnmInputs, TnmResult};
use crate::{CoreError, CoreResult};

/// Coarse disease extent driving the treatment intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallStage {
    /// Stages I to III.
    Limited,
    /// Stage IV.
    Metastatic,
}

impl OverallStage {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStage::Limited => "limited",
            OverallStage::Metastatic => "metastatic",
        }
    }

    /// Human-readable stage range.
    pub fn label(self) -> &'static str {
        match self {
            OverallStage::Limited => "I-III",
            OverallStage::Metastatic => "IV",
        }
    }
}

impl FromStr for OverallStage {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "limited" | "I-III" => Ok(OverallStage::Limited),
            "metastatic" | "IV" => Ok(OverallStage::Metastatic),
            other => Err(CoreError::InvalidInput(format!("unknown stage '{other}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreatmentHistory {
    /// No prior systemic treatment (first line).
    Naive,
    /// Previously treated (second line or later).
    Treated,
}

impl TreatmentHistory {
    pub fn as_str(self) -> &'static str {
        match self {
            TreatmentHistory::Naive => "naive",
            TreatmentHistory::Treated => "treated",
        }
    }
}

impl FromStr for TreatmentHistory {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "naive" => Ok(TreatmentHistory::Naive),
            "treated" => Ok(TreatmentHistory::Treated),
            other => Err(CoreError::InvalidInput(format!(
                "unknown treatment history '{other}'"
            ))),
        }
    }
}

/// Response to first-line chemotherapy, driving the second-line strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseStatus {
    Naive,
    /// Response lasting more than 3 months after first-line completion.
    HighlySensitive,
    /// Response lasting less than 3 months after first-line completion.
    Sensitive,
    /// Progression during first line.
    Resistant,
    /// No response to first line.
    Refractory,
}

impl ResponseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseStatus::Naive => "naive",
            ResponseStatus::HighlySensitive => "highly-sensitive",
            ResponseStatus::Sensitive => "sensitive",
            ResponseStatus::Resistant => "resistant",
            ResponseStatus::Refractory => "refractory",
        }
    }
}

impl FromStr for ResponseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "naive" => Ok(ResponseStatus::Naive),
            "highly-sensitive" => Ok(ResponseStatus::HighlySensitive),
            "sensitive" => Ok(ResponseStatus::Sensitive),
            "resistant" => Ok(ResponseStatus::Resistant),
            "refractory" => Ok(ResponseStatus::Refractory),
            other => Err(CoreError::InvalidInput(format!(
                "unknown response status '{other}'"
            ))),
        }
    }
}

/// Resolved G8 frailty information.
///
/// `Unknown` is distinct from a score of zero: it means nothing was entered at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frailty {
    Known(f64),
    Unknown,
}

impl Frailty {
    pub fn score(self) -> Option<f64> {
        match self {
            Frailty::Known(score) => Some(score),
            Frailty::Unknown => None,
        }
    }
}

/// The single aggregate input to the decision core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    /// Age in years.
    pub age: Option<u32>,
    pub performance_status: Option<PerformanceStatus>,
    /// Manually chosen stage; superseded by a valid TNM result.
    pub overall_stage: Option<OverallStage>,
    /// PET-CT and brain MRI have been performed.
    pub extension_workup_done: bool,
    pub treatment_history: Option<TreatmentHistory>,
    pub response_status: Option<ResponseStatus>,
    pub brain_metastases: bool,
    /// SCLC transformed from an EGFR-mutant non-small-cell carcinoma.
    pub egfr_mutation: bool,
    /// Manually entered or applied G8 total; takes priority over `g8_answers`.
    pub g8_score: Option<G8Score>,
    pub g8_answers: G8Answers,
    pub tnm_inputs: TnmInputs,
    pub tnm_result: Option<TnmResult>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage used to pick the treatment branch.
    ///
    /// A valid TNM stage wins (any "IV" group is metastatic, anything else limited); otherwise
    /// the manually chosen stage is used.
    pub fn effective_stage(&self) -> Option<OverallStage> {
        match self.tnm_result.and_then(|r| r.stage.stage()) {
            Some(stage) if stage.is_metastatic() => Some(OverallStage::Metastatic),
            Some(_) => Some(OverallStage::Limited),
            None => self.overall_stage,
        }
    }

    /// G8 information used by the rules: the manual score, else the aggregated answers when any
    /// answer is present, else unknown.
    pub fn frailty(&self) -> Frailty {
        if let Some(score) = self.g8_score {
            return Frailty::Known(score.value());
        }
        if self.g8_answers.has_any_answer() {
            return Frailty::Known(compute_frailty_score(&self.g8_answers));
        }
        Frailty::Unknown
    }

    /// True when a manual score is present or all eight G8 items are answered.
    pub fn is_g8_complete(&self) -> bool {
        self.g8_score.is_some() || self.g8_answers.is_complete()
    }

    /// True when a TNM result with a valid stage group has been applied.
    pub fn is_tnm_complete(&self) -> bool {
        self.tnm_result.is_some_and(|r| r.is_complete())
    }

    /// Stores a TNM result and reconciles `overall_stage` from it when its stage is valid.
    pub fn apply_tnm_result(&mut self, result: TnmResult) {
        if let Some(stage) = result.stage.stage() {
            self.overall_stage = Some(if stage.is_metastatic() {
                OverallStage::Metastatic
            } else {
                OverallStage::Limited
            });
        }
        self.tnm_result = Some(result);
    }

    /// Classifies the current `tnm_inputs` and applies the result.
    pub fn restage(&mut self) -> TnmResult {
        let result = classify_tnm(&self.tnm_inputs);
        self.apply_tnm_result(result);
        result
    }

    /// Stores a G8 total computed from the questionnaire as the record's score.
    pub fn apply_g8_score(&mut self, score: G8Score) {
        self.g8_score = Some(score);
    }

    /// Sets the treatment history, keeping the response status consistent with it.
    ///
    /// A naive patient is also response-naive; leaving the naive state clears a naive response
    /// so that the actual response can be chosen.
    pub fn set_treatment_history(&mut self, history: Option<TreatmentHistory>) {
        self.treatment_history = history;
        if history == Some(TreatmentHistory::Naive) {
            self.response_status = Some(ResponseStatus::Naive);
        } else if self.response_status == Some(ResponseStatus::Naive) {
            self.response_status = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frailty::G8Question;
    use crate::tnm::{MCategory, NCategory, StageOutcome};

    fn staged_inputs(metastasis: MCategory) -> TnmInputs {
        TnmInputs {
            tumor_size_cm: Some(2.0),
            nodes: Some(NCategory::N0),
            metastasis: Some(metastasis),
            ..TnmInputs::default()
        }
    }

    #[test]
    fn new_record_is_unset() {
        let record = PatientRecord::new();
        assert_eq!(record.age, None);
        assert_eq!(record.effective_stage(), None);
        assert_eq!(record.frailty(), Frailty::Unknown);
        assert!(!record.is_g8_complete());
        assert!(!record.is_tnm_complete());
    }

    #[test]
    fn manual_score_takes_priority_over_answers() {
        let mut record = PatientRecord::new();
        record.g8_answers.set(G8Question::Appetite, "2");
        assert_eq!(record.frailty(), Frailty::Known(2.0));

        record.g8_score = Some(G8Score::new(15.0).unwrap());
        assert_eq!(record.frailty(), Frailty::Known(15.0));
        assert!(record.is_g8_complete());
    }

    #[test]
    fn valid_tnm_stage_reconciles_overall_stage() {
        let mut record = PatientRecord::new();
        record.overall_stage = Some(OverallStage::Limited);
        record.tnm_inputs = staged_inputs(MCategory::M1c);

        let result = record.restage();

        assert_eq!(result.stage.label(), "IV B");
        assert_eq!(record.overall_stage, Some(OverallStage::Metastatic));
        assert_eq!(record.effective_stage(), Some(OverallStage::Metastatic));
        assert!(record.is_tnm_complete());
    }

    #[test]
    fn incomplete_tnm_keeps_manual_stage() {
        let mut record = PatientRecord::new();
        record.overall_stage = Some(OverallStage::Metastatic);
        record.tnm_inputs.nodes = Some(NCategory::N2);

        let result = record.restage();

        assert_eq!(result.stage, StageOutcome::Incomplete);
        assert_eq!(record.overall_stage, Some(OverallStage::Metastatic));
        assert_eq!(record.effective_stage(), Some(OverallStage::Metastatic));
        assert!(!record.is_tnm_complete());
    }

    #[test]
    fn effective_stage_prefers_tnm_over_stale_manual_stage() {
        let mut record = PatientRecord::new();
        record.tnm_result = Some(classify_tnm(&staged_inputs(MCategory::M0)));
        record.overall_stage = Some(OverallStage::Metastatic);
        assert_eq!(record.effective_stage(), Some(OverallStage::Limited));
    }

    #[test]
    fn treatment_history_keeps_response_consistent() {
        let mut record = PatientRecord::new();
        record.set_treatment_history(Some(TreatmentHistory::Naive));
        assert_eq!(record.response_status, Some(ResponseStatus::Naive));

        record.set_treatment_history(Some(TreatmentHistory::Treated));
        assert_eq!(record.response_status, None);

        record.response_status = Some(ResponseStatus::Resistant);
        record.set_treatment_history(None);
        assert_eq!(record.response_status, Some(ResponseStatus::Resistant));
    }

    #[test]
    fn parses_categorical_fields() {
        assert_eq!("I-III".parse::<OverallStage>().unwrap(), OverallStage::Limited);
        assert_eq!(
            "metastatic".parse::<OverallStage>().unwrap(),
            OverallStage::Metastatic
        );
        assert_eq!(
            "highly-sensitive".parse::<ResponseStatus>().unwrap(),
            ResponseStatus::HighlySensitive
        );
        assert!("extensive".parse::<OverallStage>().is_err());
        assert!("cured".parse::<TreatmentHistory>().is_err());
    }

    #[test]
    fn deserialises_partial_record() {
        let record: PatientRecord = serde_json::from_str(
            r#"{"age": 72, "performance_status": 1, "overall_stage": "limited",
                "g8_answers": {"appetite": "1"}}"#,
        )
        .expect("partial record");
        assert_eq!(record.age, Some(72));
        assert_eq!(record.performance_status.map(|ps| ps.grade()), Some(1));
        assert_eq!(record.frailty(), Frailty::Known(1.0));
        assert!(!record.brain_metastases);
    }
}
