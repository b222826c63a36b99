// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Appointments routes.
//!
//! Thin authenticated proxies to the appointments service. Ownership is
//! enforced by injection: reads and deletes get the resolved `user_id` as a
//! query parameter, creates get it as a body field. Client-supplied values
//! for either are discarded.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use crate::auth;
use crate::enrich::{self, EnrichError};
use crate::error::GatewayError;
use crate::models::{AppointmentEvent, EventIdQuery, GatewayEnvelope};
use crate::proxy;
use crate::state::AppState;

/// Retrieve the authenticated user's appointments.
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "Appointments",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The user's appointments"),
        (status = 401, description = "Missing or invalid credential", body = GatewayEnvelope),
        (status = 500, description = "Appointments service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    let context = auth::resolve(&headers, &state).await?;

    let url = format!("{}/appointments", state.config.appointments_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::GET,
        &url,
        &[("user_id", &context.user_id)],
        None,
        Some(&context.auth_header),
    )
    .await?;

    Ok((response.status, Json(response.body)))
}

/// Create an appointment owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/appointment",
    tag = "Appointments",
    security(("bearer" = [])),
    request_body = AppointmentEvent,
    responses(
        (status = 200, description = "Created appointment"),
        (status = 401, description = "Missing or invalid credential", body = GatewayEnvelope),
        (status = 500, description = "Appointments service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AppointmentEvent>,
) -> Result<impl IntoResponse, GatewayError> {
    let context = auth::resolve(&headers, &state).await?;

    let payload = serde_json::to_value(&body)
        .map_err(|e| EnrichError::Serialization(e.to_string()))?;
    let payload = enrich::enrich_flat(&payload, &context.user_id)?;

    let url = format!("{}/appointment", state.config.appointments_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::POST,
        &url,
        &[],
        Some(&payload),
        Some(&context.auth_header),
    )
    .await?;

    Ok((response.status, Json(response.body)))
}

/// Update one of the authenticated user's appointments.
///
/// The body is forwarded as sent; ownership travels in the query string so
/// the appointments service only matches events belonging to the caller.
#[utoipa::path(
    put,
    path = "/appointment",
    tag = "Appointments",
    security(("bearer" = [])),
    params(EventIdQuery),
    request_body = AppointmentEvent,
    responses(
        (status = 200, description = "Updated appointment"),
        (status = 401, description = "Missing or invalid credential", body = GatewayEnvelope),
        (status = 500, description = "Appointments service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Query(query): Query<EventIdQuery>,
    headers: HeaderMap,
    Json(body): Json<AppointmentEvent>,
) -> Result<impl IntoResponse, GatewayError> {
    let context = auth::resolve(&headers, &state).await?;

    let payload = serde_json::to_value(&body)
        .map_err(|e| EnrichError::Serialization(e.to_string()))?;

    let url = format!("{}/appointment", state.config.appointments_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::PUT,
        &url,
        &[("id", &query.id), ("user_id", &context.user_id)],
        Some(&payload),
        Some(&context.auth_header),
    )
    .await?;

    Ok((response.status, Json(response.body)))
}

/// Delete one of the authenticated user's appointments.
#[utoipa::path(
    delete,
    path = "/appointment",
    tag = "Appointments",
    security(("bearer" = [])),
    params(EventIdQuery),
    responses(
        (status = 200, description = "Deleted appointment"),
        (status = 401, description = "Missing or invalid credential", body = GatewayEnvelope),
        (status = 500, description = "Appointments service unreachable", body = GatewayEnvelope)
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Query(query): Query<EventIdQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    let context = auth::resolve(&headers, &state).await?;

    let url = format!("{}/appointment", state.config.appointments_url);
    let response = proxy::forward_json(
        &state.http,
        reqwest::Method::DELETE,
        &url,
        &[("id", &query.id), ("user_id", &context.user_id)],
        None,
        Some(&context.auth_header),
    )
    .await?;

    Ok((response.status, Json(response.body)))
}
