// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity service pass-throughs.
//!
//! The login/sign-up/reset flows live in the identity service; the gateway
//! relays them without inspecting credentials. These routes require no
//! bearer token. The one piece of gateway-owned state here is the default
//! bearer token, updated via `set_bearer_token`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::enrich::EnrichError;
use crate::error::GatewayError;
use crate::models::{AuthRequest, GatewayEnvelope, SetBearerTokenRequest};
use crate::proxy;
use crate::state::AppState;

/// Relay a JSON body to the identity service and pass the response through.
async fn proxy_auth(
    state: &AppState,
    path: &str,
    body: AuthRequest,
) -> Result<(StatusCode, Json<Value>), GatewayError> {
    let payload =
        serde_json::to_value(&body).map_err(|e| EnrichError::Serialization(e.to_string()))?;

    let url = format!("{}{path}", state.config.auth_api_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::POST,
        &url,
        &[],
        Some(&payload),
        None,
    )
    .await?;

    Ok((response.status, Json(response.body)))
}

/// Perform user login.
///
/// Expected body: `username` and `password`. Returns access and refresh
/// tokens on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Tokens issued by the identity service"),
        (status = 500, description = "Identity service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    proxy_auth(&state, "/login", body).await
}

/// Start the password reset flow for a user.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Reset initiated"),
        (status = 500, description = "Identity service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    proxy_auth(&state, "/reset-password", body).await
}

/// Register a new user.
///
/// Expected body: `name`, `password`, `username` and `email` (the username
/// must be the email).
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Registration accepted"),
        (status = 500, description = "Identity service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    proxy_auth(&state, "/sign-up", body).await
}

/// Confirm a registration with the emailed code.
///
/// Expected body: `username` and `confirmation_code`.
#[utoipa::path(
    post,
    path = "/auth/confirm-sign-up",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Registration confirmed"),
        (status = 500, description = "Identity service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn confirm_sign_up(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    proxy_auth(&state, "/confirm-sign-up", body).await
}

/// Exchange a refresh token for a new access token.
///
/// Expected body: `username` and `refreshToken`. A successful identity
/// service envelope is unwrapped so the client receives the token payload
/// directly.
#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "New access token"),
        (status = 500, description = "Identity service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let (status, Json(body)) = proxy_auth(&state, "/refresh-token", body).await?;

    if body.get("status").and_then(Value::as_str) == Some("ok") {
        let data = body.get("data").cloned().unwrap_or_else(|| json!({}));
        return Ok((status, Json(data)));
    }
    Ok((status, Json(body)))
}

/// Update the gateway-wide default bearer token.
///
/// Subsequent requests without an Authorization header authenticate with
/// this token. The value lives in memory only and does not survive a
/// restart.
#[utoipa::path(
    post,
    path = "/auth/set-bearer-token",
    tag = "Authentication",
    request_body = SetBearerTokenRequest,
    responses(
        (status = 200, description = "Token stored", body = GatewayEnvelope)
    )
)]
pub async fn set_bearer_token(
    State(state): State<AppState>,
    Json(body): Json<SetBearerTokenRequest>,
) -> Json<GatewayEnvelope> {
    state.set_default_token(body.new_token.clone()).await;

    tracing::info!("Default bearer token updated");

    Json(GatewayEnvelope::ok(
        "Bearer token updated successfully.",
        json!({ "new_token": body.new_token }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    fn auth_request(body: Value) -> AuthRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn set_bearer_token_stores_and_confirms() {
        let state = test_state();

        let Json(envelope) = set_bearer_token(
            State(state.clone()),
            Json(SetBearerTokenRequest {
                new_token: "tok-123".to_string(),
            }),
        )
        .await;

        assert_eq!(envelope.status, "ok");
        assert_eq!(envelope.msg, "Bearer token updated successfully.");
        assert_eq!(envelope.data, json!({"new_token": "tok-123"}));
        assert_eq!(state.default_token().await, Some("tok-123".to_string()));
    }

    #[tokio::test]
    async fn login_maps_unreachable_identity_service_to_500_envelope() {
        let state = test_state();
        let result = login(
            State(state),
            Json(auth_request(json!({"username": "u", "password": "p"}))),
        )
        .await;

        let err = match result {
            Ok(_) => panic!("expected transport failure"),
            Err(err) => err,
        };
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
