// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness endpoint.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Response for GET /hello-world.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloWorldResponse {
    pub message: String,
}

/// Simple liveness probe; requires no authentication.
#[utoipa::path(
    get,
    path = "/hello-world",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HelloWorldResponse)
    )
)]
pub async fn hello_world() -> Json<HelloWorldResponse> {
    Json(HelloWorldResponse {
        message: "Hello World".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hello_world_greets() {
        let Json(response) = hello_world().await;
        assert_eq!(response.message, "Hello World");
    }
}
