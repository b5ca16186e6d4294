//! Serialization contract between resources and stored items.
//!
//! Resources own their storage format: each kind implements [`AttributeCodec`]
//! either by hand with the field helpers below, or by delegating to the serde
//! bridge ([`serde_to_item`] / [`serde_from_item`]). The single-table adapter
//! only adds the key and discriminator attributes around whatever the codec
//! produces.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::kv::{AttributeMap, ENTITY_TYPE_ATTR, PARTITION_KEY_ATTR, SORT_KEY_ATTR};

/// Errors raised while encoding or decoding items.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Missing or invalid field: {0}")]
    MissingField(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Deterministic conversion between a resource and its stored attributes.
pub trait AttributeCodec: Sized {
    fn to_item(&self) -> Result<AttributeMap, CodecError>;

    fn from_item(item: &AttributeMap) -> Result<Self, CodecError>;

    fn from_items(items: &[AttributeMap]) -> Result<Vec<Self>, CodecError> {
        items.iter().map(Self::from_item).collect()
    }
}

// ============================================================================
// Field helpers
// ============================================================================

/// Get a required string attribute.
pub fn get_string(item: &AttributeMap, key: &str) -> Result<String, CodecError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| CodecError::MissingField(key.to_string()))
}

/// Get an optional string attribute.
pub fn get_optional_string(item: &AttributeMap, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required numeric attribute.
pub fn get_number<N: FromStr>(item: &AttributeMap, key: &str) -> Result<N, CodecError> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| CodecError::MissingField(key.to_string()))?;
    raw.parse()
        .map_err(|_| CodecError::InvalidData(format!("Invalid number {key}: {raw}")))
}

/// Get a required boolean attribute.
pub fn get_bool(item: &AttributeMap, key: &str) -> Result<bool, CodecError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| CodecError::MissingField(key.to_string()))
}

// ============================================================================
// Serde bridge
// ============================================================================

/// Encodes any serializable value whose JSON form is an object.
pub fn serde_to_item<T: Serialize>(value: &T) -> Result<AttributeMap, CodecError> {
    match serde_json::to_value(value).map_err(|e| CodecError::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, json_to_attribute(v)))
            .collect()),
        other => Err(CodecError::InvalidData(format!(
            "expected an object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Decodes an item through serde, ignoring the key and discriminator attributes.
pub fn serde_from_item<T: DeserializeOwned>(item: &AttributeMap) -> Result<T, CodecError> {
    let mut object = Map::with_capacity(item.len());
    for (key, value) in item {
        if is_reserved(key) {
            continue;
        }
        object.insert(key.clone(), attribute_to_json(value)?);
    }
    serde_json::from_value(Value::Object(object))
        .map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Converts a JSON value into its attribute representation.
pub fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.into_iter()
                .map(|(k, v)| (k, json_to_attribute(v)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

/// Converts an attribute into JSON. Binary attributes are not supported.
pub fn attribute_to_json(value: &AttributeValue) -> Result<Value, CodecError> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), attribute_to_json(v)?)))
                .collect::<Result<_, CodecError>>()?,
        ),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(CodecError::InvalidData(format!(
                "Unsupported attribute type: {other:?}"
            )))
        }
    })
}

fn parse_number(raw: &str) -> Result<Number, CodecError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CodecError::InvalidData(format!("Invalid number: {raw}")))
}

fn is_reserved(key: &str) -> bool {
    key == PARTITION_KEY_ATTR || key == SORT_KEY_ATTR || key == ENTITY_TYPE_ATTR
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
