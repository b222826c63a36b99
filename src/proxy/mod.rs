// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Downstream request forwarding.
//!
//! One shared `reqwest::Client` (bounded timeout, owned by `AppState`)
//! issues every downstream call. The original Authorization header is
//! replayed verbatim on authenticated routes. Transport failures are never
//! retried; they surface as a 500 envelope at the request boundary.

use axum::http::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection refused, timeout, DNS failure and friends.
    #[error("{0}")]
    Transport(String),

    /// The downstream answered with a body that is not JSON.
    #[error("Downstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

/// A downstream response: passthrough status plus decoded JSON body.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Issue a JSON request downstream and decode the JSON response.
///
/// The downstream status code is passed through unchanged; interpreting it
/// is the caller's concern.
pub async fn forward_json(
    http: &reqwest::Client,
    method: reqwest::Method,
    url: &str,
    query: &[(&str, &str)],
    body: Option<&Value>,
    auth_header: Option<&str>,
) -> Result<ProxiedResponse, ProxyError> {
    let mut request = http.request(method, url);
    if !query.is_empty() {
        request = request.query(query);
    }
    if let Some(auth) = auth_header {
        request = request.header(AUTHORIZATION, auth);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ProxyError::Transport(e.to_string()))?;

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response
        .json::<Value>()
        .await
        .map_err(|e| ProxyError::InvalidBody(e.to_string()))?;

    Ok(ProxiedResponse { status, body })
}

/// True when any element of the response's `data` array reports an `error`.
///
/// The queue service answers batch syncs with per-item results; partial
/// failures arrive inside an overall 200.
pub fn has_item_errors(body: &Value) -> bool {
    body.get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().any(|item| item.get("error").is_some()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let client = reqwest::Client::new();
        let err = forward_json(
            &client,
            reqwest::Method::GET,
            "http://127.0.0.1:1/appointments",
            &[],
            None,
            Some("Bearer tok"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)), "{err}");
    }

    #[tokio::test]
    async fn status_and_body_pass_through() {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/process-sync",
            post(|| async {
                (
                    StatusCode::IM_A_TEAPOT,
                    Json(json!({"data": [{"id": "1"}]})),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::new();
        let response = forward_json(
            &client,
            reqwest::Method::POST,
            &format!("http://{addr}/process-sync"),
            &[],
            Some(&json!({"items": []})),
            Some("Bearer tok"),
        )
        .await
        .unwrap();

        assert_eq!(response.status, StatusCode::IM_A_TEAPOT);
        assert_eq!(response.body, json!({"data": [{"id": "1"}]}));
    }

    #[test]
    fn item_errors_detected_anywhere_in_data() {
        assert!(has_item_errors(
            &json!({"data": [{"id": "1"}, {"id": "2", "error": "conflict"}]})
        ));
    }

    #[test]
    fn clean_data_has_no_item_errors() {
        assert!(!has_item_errors(&json!({"data": [{"id": "1"}]})));
        assert!(!has_item_errors(&json!({"data": []})));
        assert!(!has_item_errors(&json!({"msg": "ok"})));
        assert!(!has_item_errors(&json!({"data": "not-an-array"})));
    }
}
