// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every stage of credential resolution and token verification has its own
//! variant so tests and logs can tell failures apart. Outward-facing
//! messages are deliberately coarser: signature, claim and expiry failures
//! all collapse to "Invalid or expired token" so the response does not leak
//! which check rejected the credential.

use axum::http::StatusCode;

/// Authentication failure, ordered roughly by pipeline stage.
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header and no default token configured
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Token cannot be parsed as a structured signed token
    MalformedToken,
    /// Token's key id is not in the signing key set, even after a refresh
    UnknownSigningKey,
    /// Signature does not verify against the matched key
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token's not-before is in the future
    TokenNotYetValid,
    /// Issuer claim does not match configuration
    InvalidIssuer,
    /// Audience claim does not match configuration
    InvalidAudience,
    /// Verified token carries no usable `sub` claim
    MissingSubject,
    /// The JWKS endpoint could not be reached or returned an error
    KeySetUnavailable(String),
    /// A key in the set could not be turned into a decoding key
    InternalError(String),
}

impl AuthError {
    /// Stable identifier for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::MissingSubject => "missing_subject",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Message returned to the client.
    ///
    /// Verification failures share one message; only the header-shape errors
    /// and the missing-subject case keep their own.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Missing Authorization header",
            AuthError::InvalidAuthHeader => "Invalid Authorization header format",
            AuthError::MissingSubject => "User ID not found in token",
            _ => "Invalid or expired token",
        }
    }

    /// Every authentication failure rejects the request before any
    /// downstream call is made.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::UnknownSigningKey => write!(f, "No signing key matches the token's kid"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            AuthError::InvalidIssuer => write!(f, "Token issuer is invalid"),
            AuthError::InvalidAudience => write!(f, "Token audience is invalid"),
            AuthError::MissingSubject => write!(f, "Token carries no subject claim"),
            AuthError::KeySetUnavailable(msg) => write!(f, "Failed to fetch JWKS: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}
