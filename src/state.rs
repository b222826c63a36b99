// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared application state.
//!
//! Holds the loaded configuration, the outbound HTTP client, the token
//! verifier (with its JWKS cache) and the default bearer token cell. The
//! default token is the only mutable piece: it is replaced wholesale under a
//! short-held lock so concurrent readers never observe a torn value, and the
//! lock is never held across a network call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::{JwksCache, TokenVerifier};
use crate::config::GatewayConfig;

/// Outbound request timeout for downstream services.
const DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Shared client for downstream calls.
    pub http: reqwest::Client,
    pub verifier: TokenVerifier,
    /// Default bearer token used when a request carries no Authorization
    /// header. Swapped atomically by the set-bearer-token endpoint.
    default_token: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DOWNSTREAM_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let jwks = JwksCache::new(config.jwks_url.clone(), config.jwks_cache_ttl);
        let verifier = TokenVerifier::new(jwks, config.issuer.clone(), config.audience.clone());
        let default_token = Arc::new(RwLock::new(config.default_bearer_token.clone()));

        Self {
            config: Arc::new(config),
            http,
            verifier,
            default_token,
        }
    }

    /// Current default bearer token, if one is configured.
    pub async fn default_token(&self) -> Option<String> {
        self.default_token.read().await.clone()
    }

    /// Replace the default bearer token for subsequent requests.
    pub async fn set_default_token(&self, token: String) {
        *self.default_token.write().await = Some(token);
    }
}

/// State wired to unreachable downstream URLs, for handler tests.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    AppState::new(GatewayConfig {
        issuer: "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_TEST".to_string(),
        audience: "test-client-id".to_string(),
        jwks_url: "http://127.0.0.1:1/.well-known/jwks.json".to_string(),
        auth_api_url: "http://127.0.0.1:1".to_string(),
        queue_api_url: "http://127.0.0.1:1".to_string(),
        appointments_url: "http://127.0.0.1:1".to_string(),
        default_bearer_token: None,
        jwks_cache_ttl: Duration::from_secs(300),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_token_starts_from_config() {
        let mut config = test_state().config.as_ref().clone();
        config.default_bearer_token = Some("seed-token".to_string());
        let state = AppState::new(config);
        assert_eq!(state.default_token().await, Some("seed-token".to_string()));
    }

    #[tokio::test]
    async fn set_default_token_replaces_the_value() {
        let state = test_state();
        assert_eq!(state.default_token().await, None);

        state.set_default_token("tok-1".to_string()).await;
        assert_eq!(state.default_token().await, Some("tok-1".to_string()));

        state.set_default_token("tok-2".to_string()).await;
        assert_eq!(state.default_token().await, Some("tok-2".to_string()));
    }
}
