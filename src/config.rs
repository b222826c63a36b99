// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module loads the gateway configuration from the environment at
//! startup. The Cognito issuer URL is composed from the region and user pool
//! id, and the JWKS endpoint is derived from the issuer.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AWS_REGION` | AWS region of the Cognito user pool | Required |
//! | `COGNITO_USER_POOL_ID` | Cognito user pool id | Required |
//! | `COGNITO_APP_CLIENT_ID` | Expected JWT audience claim | Required |
//! | `MICRO_AUTH_API_URL` | Identity service base URL | Required |
//! | `MICRO_QUEUE_API_URL` | Queue sync service base URL | Required |
//! | `MICRO_APPOINTMENTS_URL` | Appointments service base URL | Required |
//! | `DEFAULT_BEARER_TOKEN` | Initial default bearer token | Unset |
//! | `JWKS_CACHE_TTL_SECS` | Signing key cache TTL in seconds | `300` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default signing key cache TTL (5 minutes).
pub const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 300;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Gateway configuration, loaded once at startup and shared via `AppState`.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Expected JWT issuer (`https://cognito-idp.<region>.amazonaws.com/<pool>`).
    pub issuer: String,
    /// Expected JWT audience (the Cognito app client id).
    pub audience: String,
    /// JWKS discovery endpoint, derived from the issuer.
    pub jwks_url: String,
    /// Identity service base URL (login/sign-up/reset flows are proxied here).
    pub auth_api_url: String,
    /// Queue sync service base URL.
    pub queue_api_url: String,
    /// Appointments service base URL.
    pub appointments_url: String,
    /// Initial default bearer token, if configured.
    pub default_bearer_token: Option<String>,
    /// Signing key cache TTL.
    pub jwks_cache_ttl: Duration,
}

impl GatewayConfig {
    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let region = env_required("AWS_REGION")?;
        let pool_id = env_required("COGNITO_USER_POOL_ID")?;
        let audience = env_required("COGNITO_APP_CLIENT_ID")?;

        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{pool_id}");
        let jwks_url = format!("{issuer}/.well-known/jwks.json");

        let auth_api_url = base_url(env_required("MICRO_AUTH_API_URL")?);
        let queue_api_url = base_url(env_required("MICRO_QUEUE_API_URL")?);
        let appointments_url = base_url(env_required("MICRO_APPOINTMENTS_URL")?);

        let default_bearer_token = env::var("DEFAULT_BEARER_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let jwks_cache_ttl = match env::var("JWKS_CACHE_TTL_SECS") {
            Ok(value) => {
                let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "JWKS_CACHE_TTL_SECS",
                    value,
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
        };

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            auth_api_url,
            queue_api_url,
            appointments_url,
            default_bearer_token,
            jwks_cache_ttl,
        })
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

/// Normalize a downstream base URL so paths can be appended directly.
fn base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_strips_trailing_slashes() {
        assert_eq!(base_url("http://queue:5000/".to_string()), "http://queue:5000");
        assert_eq!(base_url("http://queue:5000".to_string()), "http://queue:5000");
        assert_eq!(base_url("http://queue:5000//".to_string()), "http://queue:5000");
    }

    #[test]
    fn missing_env_error_names_the_variable() {
        let err = env_required("GATEWAY_TEST_UNSET_VARIABLE").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: GATEWAY_TEST_UNSET_VARIABLE"
        );
    }
}
