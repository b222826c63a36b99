// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-boundary error mapping.
//!
//! Every pipeline failure is converted here into the gateway envelope with
//! the right status: authentication failures 401, invalid batch items 400,
//! serialization and downstream transport failures 500. The conversion is
//! where the precise internal failure kind gets logged before the coarser
//! public message goes out.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::AuthError;
use crate::enrich::EnrichError;
use crate::models::GatewayEnvelope;
use crate::proxy::ProxyError;

#[derive(Debug)]
pub struct GatewayError {
    pub status: StatusCode,
    pub message: String,
}

impl GatewayError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status, Json(GatewayEnvelope::error(self.message))).into_response()
    }
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        tracing::warn!(kind = err.kind(), error = %err, "Authentication failed");
        Self::new(err.status_code(), err.public_message())
    }
}

impl From<EnrichError> for GatewayError {
    fn from(err: EnrichError) -> Self {
        let status = match err {
            EnrichError::InvalidItem(_) => StatusCode::BAD_REQUEST,
            EnrichError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ProxyError> for GatewayError {
    fn from(err: ProxyError) -> Self {
        tracing::warn!(error = %err, "Downstream request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn auth_failure_becomes_a_401_envelope() {
        let response = GatewayError::from(AuthError::MissingAuthHeader).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "status": "error",
                "msg": "Missing Authorization header",
                "data": {}
            })
        );
    }

    #[tokio::test]
    async fn invalid_item_becomes_a_400_with_its_index() {
        let response = GatewayError::from(EnrichError::InvalidItem(2)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["msg"], "Item at index 2 is not a valid object");
    }

    #[tokio::test]
    async fn transport_failure_becomes_a_500_envelope() {
        let response =
            GatewayError::from(ProxyError::Transport("connection refused".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["msg"], "connection refused");
    }

    #[tokio::test]
    async fn serialization_failure_becomes_a_500_envelope() {
        let response =
            GatewayError::from(EnrichError::Serialization("bad value".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
