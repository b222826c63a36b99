// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Queue sync route.
//!
//! The main route of the gateway: it authenticates the caller, stamps the
//! resolved user id into every queued item and forwards the batch to the
//! queue service. Partial downstream failures are surfaced, not hidden.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth;
use crate::enrich::{self, EnrichError};
use crate::error::GatewayError;
use crate::models::{GatewayEnvelope, ProcessSyncRequest};
use crate::proxy;
use crate::state::AppState;

/// Forward a batch of offline changes to the queue service.
///
/// Pipeline: resolve the bearer credential, set `data.user_id` on every
/// item, forward with the original Authorization header. The downstream
/// status passes through, except when any item in the response reports an
/// `error`: then the gateway answers 400 with the full per-item result set.
#[utoipa::path(
    post,
    path = "/queue/process-sync",
    tag = "Queue",
    security(("bearer" = [])),
    request_body = ProcessSyncRequest,
    responses(
        (status = 200, description = "All items processed"),
        (status = 400, description = "Invalid item or partial failure", body = GatewayEnvelope),
        (status = 401, description = "Missing or invalid credential", body = GatewayEnvelope),
        (status = 500, description = "Queue service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn process_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProcessSyncRequest>,
) -> Result<Response, GatewayError> {
    let context = auth::resolve(&headers, &state).await?;

    let payload = serde_json::to_value(&body)
        .map_err(|e| EnrichError::Serialization(e.to_string()))?;
    let payload = enrich::enrich_batch(&payload, &context.user_id)?;

    let url = format!("{}/process-sync", state.config.queue_api_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::POST,
        &url,
        &[],
        Some(&payload),
        Some(&context.auth_header),
    )
    .await?;

    if proxy::has_item_errors(&response.body) {
        let data = response
            .body
            .get("data")
            .cloned()
            .unwrap_or_else(|| json!([]));
        let envelope = GatewayEnvelope {
            status: "error".to_string(),
            msg: "Some items failed to process.".to_string(),
            data,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(envelope)).into_response());
    }

    Ok((response.status, Json(response.body)).into_response())
}
