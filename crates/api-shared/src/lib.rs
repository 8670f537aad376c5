//! # API Shared
//!
//! Shared utilities and definitions for the SCLC advisor APIs.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module)
//! - Shared services like `HealthService` and `AdvisorApi`
//! - Startup configuration and authentication utilities (usable by both gRPC and REST)
//!
//! Used by `api-grpc` and `api-rest` for common functionality.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("sclc.v1");
}

pub mod advisor;
pub mod auth;
pub mod config;
pub mod convert;
pub mod health;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use advisor::{AdvisorApi, ApiError, ApiResult};
pub use config::{ConfigError, ServiceConfig};
pub use health::HealthService;
pub use pb::*;
