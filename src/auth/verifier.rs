// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification against the user pool's signing keys.
//!
//! Verification is a single pass with no internal retries: parse the header
//! for the key id, resolve the signing key (the cache may refresh once on a
//! kid miss), verify the signature and the `iss`/`aud`/validity-window
//! claims, then extract the subject. Any retry policy belongs to the caller.

use jsonwebtoken::{decode, decode_header, Validation};
use serde_json::{Map, Value};

use super::error::AuthError;
use super::jwks::JwksCache;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Identity extracted from a successfully verified token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// The token's `sub` claim. Never empty: an absent or empty subject is
    /// a verification failure, not an identity with an empty id.
    pub user_id: String,
    /// The full verified claim set, for logging and future claims.
    pub raw_claims: Map<String, Value>,
}

/// Verifies bearer tokens issued by the configured Cognito user pool.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksCache,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(jwks: JwksCache, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Verify a bearer token and extract the caller's identity.
    pub async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Cognito tokens always name their signing key; a token without a
        // kid cannot match any key in the set.
        let kid = header.kid.ok_or(AuthError::UnknownSigningKey)?;
        let (decoding_key, algorithm) = self.jwks.decoding_key(&kid).await?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data =
            decode::<Map<String, Value>>(token, &decoding_key, &validation).map_err(map_jwt_error)?;
        let claims = token_data.claims;

        let user_id = claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::MissingSubject)?
            .to_string();

        Ok(VerifiedIdentity {
            user_id,
            raw_claims: claims,
        })
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
        jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        _ => AuthError::MalformedToken,
    }
}
