// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! The Cognito user pool publishes its signing keys at
//! `<issuer>/.well-known/jwks.json`. Keys are cached with a TTL and the
//! cached set is always replaced wholesale, never merged, so a reader
//! observes either the old set or the new one.
//!
//! Key rotation: a token may arrive signed with a key the cache has not seen
//! yet. `decoding_key` forces exactly one refresh on a kid miss before
//! reporting the key as unknown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::RwLock;

use super::error::AuthError;

/// Timeout for the JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One fetched key set with its fetch time.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// TTL-cached view of the identity provider's signing keys.
#[derive(Clone)]
pub struct JwksCache {
    jwks_url: String,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    client: reqwest::Client,
}

impl JwksCache {
    pub fn new(jwks_url: impl Into<String>, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache_ttl,
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Current key set, fetching if the cache is empty or expired.
    pub async fn get_keys(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        self.store(jwks.clone()).await;
        Ok(jwks)
    }

    /// Force a fetch, replacing the cached set wholesale.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch_jwks().await?;
        self.store(jwks.clone()).await;
        Ok(jwks)
    }

    /// Resolve the decoding key for `kid`.
    ///
    /// A miss against the cached set triggers exactly one forced refresh;
    /// a second miss is terminal for this verification.
    pub async fn decoding_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.get_keys().await?;
        if let Some(jwk) = find_key(&jwks, kid) {
            return jwk_to_decoding_key(jwk);
        }

        let jwks = self.refresh().await?;
        match find_key(&jwks, kid) {
            Some(jwk) => jwk_to_decoding_key(jwk),
            None => Err(AuthError::UnknownSigningKey),
        }
    }

    /// Whether a fresh key set is currently cached.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))
    }

    async fn store(&self, jwks: JwkSet) {
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks,
            fetched_at: Instant::now(),
        });
    }

    /// Seed the cache directly, bypassing the network.
    #[cfg(test)]
    pub(crate) async fn prime(&self, jwks: JwkSet) {
        self.store(jwks).await;
    }
}

fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .find(|key| key.common.key_id.as_deref() == Some(kid))
}

/// Convert a JWK to a DecodingKey with its pinned algorithm.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::InternalError(format!("Failed to create RSA key: {e}")))?;

            let alg = jwk
                .common
                .key_algorithm
                .map(|a| match a {
                    jsonwebtoken::jwk::KeyAlgorithm::RS256 => Algorithm::RS256,
                    jsonwebtoken::jwk::KeyAlgorithm::RS384 => Algorithm::RS384,
                    jsonwebtoken::jwk::KeyAlgorithm::RS512 => Algorithm::RS512,
                    _ => Algorithm::RS256, // Default for RSA
                })
                .unwrap_or(Algorithm::RS256);

            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| AuthError::InternalError(format!("Failed to create EC key: {e}")))?;

            let alg = jwk
                .common
                .key_algorithm
                .map(|a| match a {
                    jsonwebtoken::jwk::KeyAlgorithm::ES256 => Algorithm::ES256,
                    jsonwebtoken::jwk::KeyAlgorithm::ES384 => Algorithm::ES384,
                    _ => Algorithm::ES256, // Default for EC
                })
                .unwrap_or(Algorithm::ES256);

            Ok((key, alg))
        }
        _ => Err(AuthError::InternalError(
            "Unsupported key type in JWKS".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{sample_jwks, UNREACHABLE_JWKS_URL};

    #[tokio::test]
    async fn cache_initially_empty() {
        let cache = JwksCache::new(UNREACHABLE_JWKS_URL, Duration::from_secs(300));
        assert!(!cache.is_cached().await);
    }

    #[tokio::test]
    async fn primed_cache_serves_keys_without_fetching() {
        let cache = JwksCache::new(UNREACHABLE_JWKS_URL, Duration::from_secs(300));
        cache.prime(sample_jwks()).await;

        assert!(cache.is_cached().await);
        let jwks = cache.get_keys().await.expect("cached keys");
        assert_eq!(jwks.keys.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_key_set_unavailable() {
        let cache = JwksCache::new(UNREACHABLE_JWKS_URL, Duration::from_secs(300));
        let err = cache.get_keys().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySetUnavailable(_)), "{err}");
    }

    #[tokio::test]
    async fn decoding_key_finds_primed_kid() {
        let cache = JwksCache::new(UNREACHABLE_JWKS_URL, Duration::from_secs(300));
        cache.prime(sample_jwks()).await;

        let (_, alg) = cache.decoding_key("test-key-1").await.expect("key");
        assert_eq!(alg, Algorithm::RS256);
    }

    #[tokio::test]
    async fn expired_cache_triggers_a_fetch() {
        let cache = JwksCache::new(UNREACHABLE_JWKS_URL, Duration::from_secs(0));
        cache.prime(sample_jwks()).await;

        // TTL of zero makes the primed entry immediately stale.
        assert!(!cache.is_cached().await);
        let err = cache.get_keys().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySetUnavailable(_)));
    }
}
