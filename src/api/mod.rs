// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: router, OpenAPI documentation and the route handlers.

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AppointmentEvent, AuthRequest, GatewayEnvelope, ProcessSyncRequest, SetBearerTokenRequest,
        SyncAction, SyncDomain, SyncItem,
    },
    state::AppState,
};

pub mod appointments;
pub mod auth_routes;
pub mod health;
pub mod queue;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/hello-world", get(health::hello_world))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/reset-password", post(auth_routes::reset_password))
        .route("/auth/sign-up", post(auth_routes::sign_up))
        .route("/auth/confirm-sign-up", post(auth_routes::confirm_sign_up))
        .route("/auth/refresh-token", post(auth_routes::refresh_token))
        .route("/auth/set-bearer-token", post(auth_routes::set_bearer_token))
        .route("/queue/process-sync", post(queue::process_sync))
        .route("/appointments", get(appointments::list_appointments))
        .route(
            "/appointment",
            post(appointments::create_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .with_state(state);

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/docs") }))
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::hello_world,
        auth_routes::login,
        auth_routes::reset_password,
        auth_routes::sign_up,
        auth_routes::confirm_sign_up,
        auth_routes::refresh_token,
        auth_routes::set_bearer_token,
        queue::process_sync,
        appointments::list_appointments,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::delete_appointment
    ),
    components(
        schemas(
            GatewayEnvelope,
            AuthRequest,
            ProcessSyncRequest,
            SyncItem,
            SyncDomain,
            SyncAction,
            AppointmentEvent,
            SetBearerTokenRequest,
            health::HelloWorldResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Identity service pass-throughs and the default bearer token"),
        (name = "Queue", description = "Item synchronization (authentication required)"),
        (name = "Appointments", description = "Appointment retrieval and manipulation (authentication required)")
    )
)]
struct ApiDoc;
