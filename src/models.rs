// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the gateway routes. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Proxied bodies keep the downstream contracts: the queue sync payload is a
//! list of tagged [`SyncItem`]s, the appointment event is an open record
//! whose known fields are typed and whose extra fields pass through
//! untouched. `user_id` fields supplied by the client are always overwritten
//! with the authenticated subject before forwarding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Gateway Envelope
// =============================================================================

/// Uniform shape for every gateway-originated response.
///
/// Successfully proxied downstream bodies are passed through verbatim and do
/// not use this envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewayEnvelope {
    /// `"ok"` or `"error"`.
    pub status: String,
    /// Human-readable outcome message.
    pub msg: String,
    /// Payload; an empty object for most errors.
    #[schema(value_type = Object)]
    pub data: Value,
}

impl GatewayEnvelope {
    pub fn ok(msg: impl Into<String>, data: Value) -> Self {
        Self {
            status: "ok".to_string(),
            msg: msg.into(),
            data,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            msg: msg.into(),
            data: json!({}),
        }
    }
}

// =============================================================================
// Identity Service Models
// =============================================================================

/// Open request body for the identity service pass-throughs.
///
/// Known fields cover the login, sign-up, confirmation and refresh flows;
/// anything extra passes through untouched. Fields the client does not send
/// are omitted from the forwarded payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthRequest {
    /// User name (the user's email).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Full name, for sign-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Confirmation code received by email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// Refresh token obtained during login.
    #[serde(
        default,
        rename = "refreshToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
    /// Fields the identity service accepts that the gateway does not
    /// interpret.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Queue Sync Models
// =============================================================================

/// Business domain a sync item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SyncDomain {
    Appointment,
    Doctor,
    Address,
}

/// Operation requested for a sync item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

/// One offline-queued change to synchronize.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncItem {
    /// Client-assigned item id.
    pub id: String,
    pub domain: SyncDomain,
    pub action: SyncAction,
    /// Domain payload. The gateway sets `data.user_id` before forwarding.
    #[schema(value_type = Object)]
    pub data: Value,
}

/// Body of `POST /queue/process-sync`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessSyncRequest {
    pub items: Vec<SyncItem>,
}

// =============================================================================
// Appointment Models
// =============================================================================

/// Appointment event forwarded to the appointments service.
///
/// Every field is optional and omitted from the forwarded payload when the
/// client did not send it; unknown fields pass through unchanged. The
/// gateway overwrites `user_id` with the authenticated subject on create.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentEvent {
    /// Event id (generated downstream if not provided).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// Event date and time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    /// Owner of the event; overwritten by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Event type: 1 = consultation, 2 = exam.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<i64>,
    /// Fields the downstream service accepts that the gateway does not
    /// interpret.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Query parameters naming one appointment.
#[derive(Debug, Deserialize, IntoParams)]
pub struct EventIdQuery {
    /// Event id.
    pub id: String,
}

// =============================================================================
// Admin Models
// =============================================================================

/// Body of `POST /auth/set-bearer-token`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetBearerTokenRequest {
    /// Token used as the default for requests without an Authorization
    /// header.
    pub new_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_error_has_empty_object_data() {
        let envelope = GatewayEnvelope::error("boom");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "msg": "boom", "data": {}})
        );
    }

    #[test]
    fn auth_request_omits_unset_fields_and_keeps_extras() {
        let request: AuthRequest = serde_json::from_value(json!({
            "username": "user@example.com",
            "refreshToken": "rt-1",
            "device_id": "abc"
        }))
        .unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "user@example.com",
                "refreshToken": "rt-1",
                "device_id": "abc"
            })
        );
    }

    #[test]
    fn sync_item_round_trips_lowercase_tags() {
        let item: SyncItem = serde_json::from_value(json!({
            "id": "1",
            "domain": "appointment",
            "action": "create",
            "data": {"k": "v"}
        }))
        .unwrap();
        assert_eq!(item.domain, SyncDomain::Appointment);
        assert_eq!(item.action, SyncAction::Create);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["domain"], "appointment");
        assert_eq!(value["action"], "create");
    }

    #[test]
    fn sync_item_rejects_unknown_domain() {
        let result = serde_json::from_value::<SyncItem>(json!({
            "id": "1",
            "domain": "vehicle",
            "action": "create",
            "data": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn appointment_event_omits_unset_fields() {
        let event: AppointmentEvent =
            serde_json::from_value(json!({"name": "Consulta", "custom_flag": true})).unwrap();

        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("name"), Some(&json!("Consulta")));
        assert_eq!(object.get("custom_flag"), Some(&json!(true)));
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("user_id"));
    }

    #[test]
    fn appointment_event_keeps_typed_and_extra_fields_apart() {
        let event: AppointmentEvent = serde_json::from_value(json!({
            "name": "Consulta Dermatologista",
            "type": 2,
            "priority": "high"
        }))
        .unwrap();
        assert_eq!(event.event_type, Some(2));
        assert_eq!(event.extra.get("priority"), Some(&json!("high")));
    }
}
