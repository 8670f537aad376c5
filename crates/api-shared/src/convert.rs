//! Translation between protobuf messages and wire/domain types.
//!
//! Inbound messages are mapped onto the `sclc-wire` form types so that text parsing follows a
//! single path for every host. Outbound messages are built from domain values.

use sclc_core::{FrailtyAssessment, G8Answers, OverallStage, Recommendation, TnmResult};
use sclc_types::{format_points, G8_MAX_POINTS};
use sclc_wire::{parse_g8_answers, FormRecord, FormTnm, WireResult};

use crate::pb;

// ============================================================================
// Inbound
// ============================================================================

pub fn g8_answers_from_pb(answers: Vec<pb::G8Answer>) -> WireResult<G8Answers> {
    parse_g8_answers(answers.into_iter().map(|a| (a.question, a.value)))
}

pub fn tnm_form_from_pb(inputs: pb::TnmInputs) -> FormTnm {
    FormTnm {
        tumor_size_cm: inputs.tumor_size_cm,
        characteristics: inputs.characteristics,
        nodes: inputs.nodes,
        metastasis: inputs.metastasis,
    }
}

pub fn form_from_pb(record: pb::PatientRecord) -> FormRecord {
    FormRecord {
        age: record.age,
        performance_status: record.performance_status,
        overall_stage: record.overall_stage,
        extension_workup_done: record.extension_workup_done,
        treatment_history: record.treatment_history,
        response_status: record.response_status,
        brain_metastases: record.brain_metastases,
        egfr_mutation: record.egfr_mutation,
        g8_score: record.g8_score,
        g8_answers: record
            .g8_answers
            .into_iter()
            .map(|a| (a.question, a.value))
            .collect(),
        tnm: record.tnm.map(tnm_form_from_pb).unwrap_or_default(),
    }
}

// ============================================================================
// Outbound
// ============================================================================

pub fn frailty_to_pb(assessment: FrailtyAssessment) -> pb::FrailtyScoreRes {
    pb::FrailtyScoreRes {
        score: assessment.score,
        display: format!(
            "{}/{}",
            format_points(assessment.score),
            format_points(G8_MAX_POINTS)
        ),
        complete: assessment.complete,
        frail: assessment.frail,
    }
}

pub fn tnm_result_to_pb(result: TnmResult) -> pb::ClassifyTnmRes {
    pb::ClassifyTnmRes {
        t: result.t.to_string(),
        n: result.n.to_string(),
        m: result.m.to_string(),
        stage: result.stage.label().to_string(),
        complete: result.is_complete(),
    }
}

pub fn recommendation_to_pb(rec: Recommendation) -> pb::Recommendation {
    pb::Recommendation {
        severity: rec.severity.as_str().to_string(),
        category: rec.category,
        text: rec.text,
    }
}

pub fn stage_to_pb(stage: Option<OverallStage>) -> String {
    stage.map(|s| s.as_str().to_string()).unwrap_or_default()
}
