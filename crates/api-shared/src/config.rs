//! Service runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the servers. Request handlers never read environment variables.

use std::net::SocketAddr;

/// Default gRPC listen address.
pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:50051";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} must be 'true' or 'false' (got '{value}')")]
    InvalidFlag { var: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Server configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    grpc_addr: SocketAddr,
    rest_addr: SocketAddr,
    api_key: Option<String>,
    enable_reflection: bool,
}

impl ServiceConfig {
    /// Resolve configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `SCLC_GRPC_ADDR`: gRPC server address (default: "0.0.0.0:50051")
    /// - `SCLC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
    /// - `SCLC_API_KEY`: when set, gRPC calls must carry it in `x-api-key`
    /// - `SCLC_ENABLE_REFLECTION`: "true" enables gRPC reflection
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        Ok(Self {
            grpc_addr: addr_from_env_value(
                "SCLC_GRPC_ADDR",
                lookup("SCLC_GRPC_ADDR"),
                DEFAULT_GRPC_ADDR,
            )?,
            rest_addr: addr_from_env_value(
                "SCLC_REST_ADDR",
                lookup("SCLC_REST_ADDR"),
                DEFAULT_REST_ADDR,
            )?,
            api_key: lookup("SCLC_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            enable_reflection: flag_from_env_value(
                "SCLC_ENABLE_REFLECTION",
                lookup("SCLC_ENABLE_REFLECTION"),
            )?,
        })
    }

    pub fn grpc_addr(&self) -> SocketAddr {
        self.grpc_addr
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn enable_reflection(&self) -> bool {
        self.enable_reflection
    }
}

/// Parse a socket address from an optional value, falling back to `default` when absent or blank.
fn addr_from_env_value(
    var: &'static str,
    value: Option<String>,
    default: &str,
) -> ConfigResult<SocketAddr> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::InvalidAddr { var, value })
}

fn flag_from_env_value(var: &'static str, value: Option<String>) -> ConfigResult<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(ConfigError::InvalidFlag {
            var,
            value: other.to_string(),
        }),
    }
}
