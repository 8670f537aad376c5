//! Standalone gRPC server binary.
//!
//! ## Purpose
//! Runs the gRPC API server on its own. The workspace's main `sclc-run` binary runs both gRPC and
//! REST concurrently.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::build_server;
use api_shared::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_grpc=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_env()?;
    let addr = cfg.grpc_addr();

    tracing::info!("-- Starting SCLC advisor gRPC on {}", addr);

    build_server(&cfg)?.serve(addr).await?;

    Ok(())
}
