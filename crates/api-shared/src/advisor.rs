//! Request handling shared by the gRPC and REST servers.
//!
//! Both transports accept the same protobuf messages, so the translation into domain values and
//! the call into the decision core live here once.

use sclc_core::AdvisorService;
use sclc_wire::WireError;

use crate::convert;
use crate::pb;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] WireError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for tonic::Status {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(_) => tonic::Status::invalid_argument(err.to_string()),
        }
    }
}

/// Protobuf-level facade over [`AdvisorService`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvisorApi {
    service: AdvisorService,
}

impl AdvisorApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_frailty_score(
        &self,
        req: pb::FrailtyScoreReq,
    ) -> ApiResult<pb::FrailtyScoreRes> {
        let answers = convert::g8_answers_from_pb(req.answers)?;
        let assessment = self.service.compute_frailty_score(&answers);
        Ok(convert::frailty_to_pb(assessment))
    }

    pub fn classify_tnm(&self, req: pb::ClassifyTnmReq) -> ApiResult<pb::ClassifyTnmRes> {
        let inputs = convert::tnm_form_from_pb(req.inputs.unwrap_or_default()).into_inputs()?;
        let result = self.service.classify_tnm(&inputs);
        Ok(convert::tnm_result_to_pb(result))
    }

    /// Generates recommendations for the supplied record.
    ///
    /// A missing record is treated as an empty one, which yields the workup, staging and closing
    /// blocks only.
    pub fn generate_recommendations(
        &self,
        req: pb::RecommendationsReq,
    ) -> ApiResult<pb::RecommendationsRes> {
        let record = convert::form_from_pb(req.record.unwrap_or_default()).into_record()?;
        let recommendations = self.service.generate_recommendations(&record);

        Ok(pb::RecommendationsRes {
            recommendations: recommendations
                .into_iter()
                .map(convert::recommendation_to_pb)
                .collect(),
            effective_stage: convert::stage_to_pb(record.effective_stage()),
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
