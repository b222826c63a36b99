// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential resolution for proxied routes.
//!
//! Handlers call [`resolve`] before forwarding anything downstream. A
//! request without an Authorization header falls back to the gateway-wide
//! default token (set via the admin endpoint); the resolved header string is
//! retained because it is re-sent verbatim to the downstream services.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::error::AuthError;
use crate::state::AppState;

/// Resolved request identity: the authenticated user plus the exact
/// Authorization header value to replay downstream.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub auth_header: String,
}

/// Resolve the caller's identity from the request headers.
///
/// Each step short-circuits: header (or default token), `Bearer <token>`
/// shape, then full verification.
pub async fn resolve(headers: &HeaderMap, state: &AppState) -> Result<AuthContext, AuthError> {
    let auth_header = match headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?
            .to_string(),
        None => {
            let default = state
                .default_token()
                .await
                .ok_or(AuthError::MissingAuthHeader)?;
            format!("Bearer {default}")
        }
    };

    let token = parse_bearer(&auth_header)?;
    let identity = state.verifier.verify(token).await?;

    tracing::debug!(user_id = %identity.user_id, "Resolved bearer credential");

    Ok(AuthContext {
        user_id: identity.user_id,
        auth_header,
    })
}

/// Parse a `Bearer <token>` header: exactly two whitespace-separated parts,
/// scheme matched case-insensitively.
fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(parts[1])
}
