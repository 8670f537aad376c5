// Re-export the proto module from the shared `api-shared` crate.
pub use api_shared::pb;

use std::sync::Arc;

use api_shared::auth::{self, API_KEY_HEADER};
use api_shared::pb::advisor_server::{Advisor, AdvisorServer};
use api_shared::{AdvisorApi, HealthService, ServiceConfig, FILE_DESCRIPTOR_SET};
use tonic::service::Interceptor;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// Authentication interceptor checking `x-api-key` against the configured key.
///
/// Without a configured key every request passes.
#[derive(Clone, Debug, Default)]
pub struct ApiKeyInterceptor {
    expected: Option<Arc<str>>,
}

impl ApiKeyInterceptor {
    pub fn new(expected: Option<&str>) -> Self {
        Self {
            expected: expected.map(Arc::from),
        }
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn call(&mut self, req: Request<()>) -> Result<Request<()>, Status> {
        let provided = req
            .metadata()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        auth::validate_api_key(self.expected.as_deref(), provided)?;
        Ok(req)
    }
}

#[derive(Default, Clone)]
pub struct AdvisorGrpc {
    api: AdvisorApi,
}

#[tonic::async_trait]
impl Advisor for AdvisorGrpc {
    async fn health(&self, _req: Request<()>) -> Result<Response<pb::HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health()))
    }

    async fn compute_frailty_score(
        &self,
        req: Request<pb::FrailtyScoreReq>,
    ) -> Result<Response<pb::FrailtyScoreRes>, Status> {
        let res = self.api.compute_frailty_score(req.into_inner())?;
        Ok(Response::new(res))
    }

    async fn classify_tnm(
        &self,
        req: Request<pb::ClassifyTnmReq>,
    ) -> Result<Response<pb::ClassifyTnmRes>, Status> {
        let res = self.api.classify_tnm(req.into_inner())?;
        Ok(Response::new(res))
    }

    async fn generate_recommendations(
        &self,
        req: Request<pb::RecommendationsReq>,
    ) -> Result<Response<pb::RecommendationsRes>, Status> {
        let res = self.api.generate_recommendations(req.into_inner())?;
        tracing::info!(
            count = res.recommendations.len(),
            stage = %res.effective_stage,
            "served recommendations"
        );
        Ok(Response::new(res))
    }
}

/// Builds the gRPC router with authentication and, when enabled, reflection.
pub fn build_server(cfg: &ServiceConfig) -> anyhow::Result<Router> {
    if cfg.api_key().is_none() {
        tracing::warn!("SCLC_API_KEY not set: gRPC requests are not authenticated");
    }

    let mut router = Server::builder().add_service(AdvisorServer::with_interceptor(
        AdvisorGrpc::default(),
        ApiKeyInterceptor::new(cfg.api_key()),
    ));

    if cfg.enable_reflection() {
        let reflection_service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        router = router.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_key(key: Option<&str>) -> Request<()> {
        let mut req = Request::new(());
        if let Some(key) = key {
            req.metadata_mut()
                .insert(API_KEY_HEADER, key.parse().expect("ascii metadata"));
        }
        req
    }

    #[test]
    fn interceptor_enforces_configured_key() {
        let mut open = ApiKeyInterceptor::new(None);
        assert!(open.call(request_with_key(None)).is_ok());

        let mut locked = ApiKeyInterceptor::new(Some("secret"));
        assert!(locked.call(request_with_key(Some("secret"))).is_ok());
        let err = locked
            .call(request_with_key(Some("nope")))
            .expect_err("wrong key");
        assert_eq!(err.code(), tonic::Code::Unauthenticated);
        assert!(locked.call(request_with_key(None)).is_err());
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let res = AdvisorGrpc::default()
            .health(Request::new(()))
            .await
            .expect("health");
        assert!(res.into_inner().ok);
    }

    #[tokio::test]
    async fn invalid_record_is_invalid_argument() {
        let status = AdvisorGrpc::default()
            .generate_recommendations(Request::new(pb::RecommendationsReq {
                record: Some(pb::PatientRecord {
                    performance_status: "9".into(),
                    ..Default::default()
                }),
            }))
            .await
            .expect_err("PS out of range");
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn classifies_through_grpc() {
        let res = AdvisorGrpc::default()
            .classify_tnm(Request::new(pb::ClassifyTnmReq {
                inputs: Some(pb::TnmInputs {
                    tumor_size_cm: "1.5".into(),
                    nodes: "N0".into(),
                    metastasis: "M0".into(),
                    ..Default::default()
                }),
            }))
            .await
            .expect("classified")
            .into_inner();
        assert_eq!(res.stage, "I A");
    }
}
