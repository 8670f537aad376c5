use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::build_server;
use api_rest::{router, AppState};
use api_shared::{AdvisorApi, ServiceConfig};

/// Main entry point for the SCLC advisor
///
/// Starts both gRPC and REST servers concurrently:
/// - gRPC server on port 50051 (configurable via SCLC_GRPC_ADDR)
/// - REST server on port 3000 (configurable via SCLC_REST_ADDR)
///
/// The gRPC server requires an `x-api-key` header when SCLC_API_KEY is set.
/// The REST server provides open access and serves Swagger UI at `/swagger-ui`.
///
/// # Returns
/// * `Ok(())` - If servers start and run successfully
/// * `Err(anyhow::Error)` - If configuration, startup or either server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("sclc=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_env()?;

    tracing::info!("++ Starting SCLC advisor gRPC on {}", cfg.grpc_addr());
    tracing::info!("++ Starting SCLC advisor REST on {}", cfg.rest_addr());

    let rest_app = router(AppState::new(AdvisorApi::new()));
    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    let rest_server = async move { axum::serve(listener, rest_app).await };

    let grpc_server = build_server(&cfg)?.serve(cfg.grpc_addr());

    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    rest_result?;
    grpc_result?;

    Ok(())
}
