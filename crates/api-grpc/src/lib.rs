//! # API gRPC
//!
//! gRPC server implementation for the SCLC advisor.
//!
//! Handles:
//! - gRPC service setup and authentication
//! - Service implementations using `api-shared` and `sclc-core` for the decision logic
//! - gRPC-specific concerns (interceptors, reflection, tonic integration)

#![warn(rust_2018_idioms)]

pub use service::{build_server, pb, AdvisorGrpc, ApiKeyInterceptor};

pub mod service;
