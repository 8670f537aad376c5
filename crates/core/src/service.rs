use serde::{Deserialize, Serialize};

use crate::frailty::{self, G8Answers};
use crate::recommendation::Recommendation;
use crate::record::PatientRecord;
use crate::rules;
use crate::tnm::{self, TnmInputs, TnmResult};

/// Aggregated G8 questionnaire outcome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrailtyAssessment {
    /// Sum of the parseable answers.
    pub score: f64,
    /// All eight items answered.
    pub complete: bool,
    /// Score at or below the frailty cutoff. Always false when nothing is answered.
    pub frail: bool,
}

/// Pure decision operations - no API concerns
#[derive(Default, Clone, Copy, Debug)]
pub struct AdvisorService;

impl AdvisorService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregates G8 answers into a score.
    ///
    /// The `frail` flag is only meaningful once `complete` is true; a partial questionnaire
    /// scores low simply because items are missing. An empty questionnaire is never frail.
    pub fn compute_frailty_score(&self, answers: &G8Answers) -> FrailtyAssessment {
        let score = frailty::compute_frailty_score(answers);
        let assessment = FrailtyAssessment {
            score,
            complete: answers.is_complete(),
            frail: answers.has_any_answer() && frailty::is_frail(score),
        };
        tracing::debug!(
            score = assessment.score,
            complete = assessment.complete,
            "computed G8 score"
        );
        assessment
    }

    pub fn classify_tnm(&self, inputs: &TnmInputs) -> TnmResult {
        let result = tnm::classify_tnm(inputs);
        tracing::debug!(
            t = %result.t,
            n = %result.n,
            m = %result.m,
            stage = %result.stage,
            "classified TNM"
        );
        result
    }

    pub fn generate_recommendations(&self, record: &PatientRecord) -> Vec<Recommendation> {
        let recommendations = rules::generate_recommendations(record);
        tracing::debug!(
            count = recommendations.len(),
            "generated recommendations"
        );
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frailty::G8Question;
    use crate::tnm::{MCategory, NCategory, Stage, StageOutcome};

    #[test]
    fn partial_questionnaire_is_flagged_incomplete() {
        let answers = G8Answers::new()
            .with(G8Question::Appetite, "2")
            .with(G8Question::Age, "1");
        let assessment = AdvisorService::new().compute_frailty_score(&answers);
        assert_eq!(assessment.score, 3.0);
        assert!(!assessment.complete);
        assert!(assessment.frail);
    }

    #[test]
    fn empty_questionnaire_is_not_frail() {
        let assessment = AdvisorService::new().compute_frailty_score(&G8Answers::new());
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.score.is_sign_positive());
        assert!(!assessment.complete);
        assert!(!assessment.frail);

        let blank = G8Answers::new().with(G8Question::Mobility, "  ");
        assert!(!AdvisorService::new().compute_frailty_score(&blank).frail);
    }

    #[test]
    fn classifies_through_service() {
        let inputs = TnmInputs {
            tumor_size_cm: Some(4.5),
            nodes: Some(NCategory::N0),
            metastasis: Some(MCategory::M0),
            ..TnmInputs::default()
        };
        let result = AdvisorService::new().classify_tnm(&inputs);
        assert_eq!(result.stage, StageOutcome::Staged(Stage::IIA));
    }

    #[test]
    fn service_matches_rule_engine() {
        let record = PatientRecord::new();
        assert_eq!(
            AdvisorService::new().generate_recommendations(&record),
            rules::generate_recommendations(&record)
        );
    }
}
