// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Micro Gateway - Authenticating Reverse-Proxy Gateway
//!
//! This crate receives front-end requests, verifies the caller's Cognito
//! bearer token against the user pool's JWKS, injects the authenticated user
//! id into forwarded payloads and relays requests to the downstream
//! microservices.
//!
//! ## Modules
//!
//! - `api` - HTTP route handlers and router (Axum)
//! - `auth` - Credential resolution and JWT verification
//! - `enrich` - Payload enrichment with the resolved user id
//! - `proxy` - Downstream request forwarding

pub mod api;
pub mod auth;
pub mod config;
pub mod enrich;
pub mod error;
pub mod models;
pub mod proxy;
pub mod state;
