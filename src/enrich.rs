// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payload enrichment: injecting the authenticated user id into outbound
//! bodies.
//!
//! Two route shapes exist. Flat routes (single-entity create) get a
//! top-level `user_id`; batch sync routes get `data.user_id` on every item.
//! Enrichment builds a new payload rather than mutating the input, so a
//! failed batch leaves nothing partially enriched to forward.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnrichError {
    /// The batch element at this index is not a JSON object. Aborts the
    /// whole batch; nothing is forwarded.
    #[error("Item at index {0} is not a valid object")]
    InvalidItem(usize),

    #[error("Error serializing payload: {0}")]
    Serialization(String),
}

/// Set the top-level `user_id` on a flat payload, overwriting any
/// client-supplied value.
pub fn enrich_flat(payload: &Value, user_id: &str) -> Result<Value, EnrichError> {
    let mut object = as_object(payload)?;
    object.insert("user_id".to_string(), Value::String(user_id.to_string()));
    Ok(Value::Object(object))
}

/// Set `data.user_id` on every element of the payload's `items` array,
/// overwriting any existing value. An item's `data` is replaced with a fresh
/// object when absent or not an object.
///
/// Items are processed in array order; the first non-object item aborts the
/// batch with its index.
pub fn enrich_batch(payload: &Value, user_id: &str) -> Result<Value, EnrichError> {
    let mut root = as_object(payload)?;
    let items = match root.remove("items") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let mut enriched = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut object = match item {
            Value::Object(object) => object,
            _ => return Err(EnrichError::InvalidItem(index)),
        };

        let mut data = match object.remove("data") {
            Some(Value::Object(data)) => data,
            _ => Map::new(),
        };
        data.insert("user_id".to_string(), Value::String(user_id.to_string()));
        object.insert("data".to_string(), Value::Object(data));

        enriched.push(Value::Object(object));
    }

    root.insert("items".to_string(), Value::Array(enriched));
    Ok(Value::Object(root))
}

fn as_object(payload: &Value) -> Result<Map<String, Value>, EnrichError> {
    payload
        .as_object()
        .cloned()
        .ok_or_else(|| EnrichError::Serialization("payload is not a JSON object".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_adds_user_id_and_nothing_else() {
        let body = json!({"name": "Consulta", "doctor_id": 1});
        let enriched = enrich_flat(&body, "u1").unwrap();
        assert_eq!(
            enriched,
            json!({"name": "Consulta", "doctor_id": 1, "user_id": "u1"})
        );
    }

    #[test]
    fn flat_overwrites_client_supplied_user_id() {
        let body = json!({"user_id": "intruder"});
        let enriched = enrich_flat(&body, "u1").unwrap();
        assert_eq!(enriched, json!({"user_id": "u1"}));
    }

    #[test]
    fn flat_rejects_non_object_payloads() {
        let err = enrich_flat(&json!([1, 2]), "u1").unwrap_err();
        assert!(matches!(err, EnrichError::Serialization(_)));
    }

    #[test]
    fn batch_sets_data_user_id_on_every_item() {
        let body = json!({"items": [
            {"id": "1", "domain": "appointment", "action": "create", "data": {"k": "v"}},
            {"id": "2", "domain": "doctor", "action": "update", "data": {}}
        ]});
        let enriched = enrich_batch(&body, "u42").unwrap();
        assert_eq!(
            enriched,
            json!({"items": [
                {"id": "1", "domain": "appointment", "action": "create",
                 "data": {"k": "v", "user_id": "u42"}},
                {"id": "2", "domain": "doctor", "action": "update",
                 "data": {"user_id": "u42"}}
            ]})
        );
    }

    #[test]
    fn batch_replaces_missing_or_invalid_data_with_fresh_object() {
        let body = json!({"items": [
            {"id": "1"},
            {"id": "2", "data": "not-an-object"}
        ]});
        let enriched = enrich_batch(&body, "u1").unwrap();
        assert_eq!(enriched["items"][0]["data"], json!({"user_id": "u1"}));
        assert_eq!(enriched["items"][1]["data"], json!({"user_id": "u1"}));
    }

    #[test]
    fn batch_is_idempotent() {
        let body = json!({"items": [
            {"id": "1", "data": {"k": "v"}}
        ]});
        let once = enrich_batch(&body, "u1").unwrap();
        let twice = enrich_batch(&once, "u1").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn batch_reports_the_first_invalid_index() {
        let body = json!({"items": [
            {"id": "0"},
            "not-an-object",
            42
        ]});
        let err = enrich_batch(&body, "u1").unwrap_err();
        assert_eq!(err, EnrichError::InvalidItem(1));
    }

    #[test]
    fn failed_batch_leaves_the_input_untouched() {
        let body = json!({"items": [{"id": "0"}, 42]});
        let original = body.clone();

        assert!(enrich_batch(&body, "u1").is_err());
        assert_eq!(body, original);
    }

    #[test]
    fn batch_without_items_gets_an_empty_array() {
        let enriched = enrich_batch(&json!({}), "u1").unwrap();
        assert_eq!(enriched, json!({"items": []}));
    }

    #[test]
    fn batch_preserves_item_order() {
        let body = json!({"items": [
            {"id": "a"}, {"id": "b"}, {"id": "c"}
        ]});
        let enriched = enrich_batch(&body, "u1").unwrap();
        let ids: Vec<&str> = enriched["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
