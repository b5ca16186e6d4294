//! Key-value store boundary.
//!
//! The single-table adapter only needs four operations from a store: point
//! get, partition-scoped range query, put and delete. Items travel in the
//! DynamoDB attribute representation whatever the backend is, so the
//! in-memory store and the DynamoDB client are interchangeable.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tablerest_core::query::SortDirection;
use tablerest_core::storage::StorageKey;
use thiserror::Error;

/// One stored item in the store's native attribute encoding.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Attribute holding the partition key.
pub const PARTITION_KEY_ATTR: &str = "PK";
/// Attribute holding the sort key.
pub const SORT_KEY_ATTR: &str = "SK";
/// Attribute holding the resource kind discriminator.
pub const ENTITY_TYPE_ATTR: &str = "entityType";

/// Errors reported by a key-value store client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KvError {
    /// The table (or partition, for stores that model it) does not exist.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Throughput exceeded, please retry: {0}")]
    Throttled(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Malformed item: {0}")]
    Malformed(String),
    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl KvError {
    /// True when the store reported "no such table or partition".
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::ResourceNotFound(_))
    }
}

/// A partition-scoped range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub partition_key: String,
    /// Restricts results to sort keys starting with this prefix.
    pub sort_key_prefix: Option<String>,
    pub direction: SortDirection,
    /// Maximum number of items evaluated. `None` lets the store pick.
    pub limit: Option<i32>,
    /// Resume after this key.
    pub exclusive_start: Option<StorageKey>,
    /// Equality conditions on string attributes, applied after `limit`.
    pub filter: BTreeMap<String, String>,
}

impl RangeQuery {
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key_prefix: None,
            direction: SortDirection::Descending,
            limit: None,
            exclusive_start: None,
            filter: BTreeMap::new(),
        }
    }

    pub fn with_sort_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sort_key_prefix = Some(prefix.into());
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_limit(mut self, limit: Option<i32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_exclusive_start(mut self, key: Option<StorageKey>) -> Self {
        self.exclusive_start = key;
        self
    }

    pub fn with_filter(mut self, filter: BTreeMap<String, String>) -> Self {
        self.filter = filter;
        self
    }
}

/// One page of range query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<AttributeMap>,
    /// Key of the last evaluated item when more results may follow.
    pub last_evaluated: Option<StorageKey>,
}

/// Client abstraction over a composite-key key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Point read. Absent items are `Ok(None)`.
    async fn get(&self, key: &StorageKey) -> Result<Option<AttributeMap>, KvError>;

    /// Range query within one partition.
    async fn query(&self, query: &RangeQuery) -> Result<QueryPage, KvError>;

    /// Unconditional overwrite. The item must carry its key attributes.
    async fn put(&self, item: AttributeMap) -> Result<(), KvError>;

    /// Deletes the item at `key`. Deleting an absent item succeeds.
    async fn delete(&self, key: &StorageKey) -> Result<(), KvError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &StorageKey) -> Result<Option<AttributeMap>, KvError> {
        (**self).get(key).await
    }

    async fn query(&self, query: &RangeQuery) -> Result<QueryPage, KvError> {
        (**self).query(query).await
    }

    async fn put(&self, item: AttributeMap) -> Result<(), KvError> {
        (**self).put(item).await
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), KvError> {
        (**self).delete(key).await
    }
}

/// Key attributes for `key`, ready to be used as a DynamoDB key map.
pub fn key_to_attributes(key: &StorageKey) -> AttributeMap {
    HashMap::from([
        (
            PARTITION_KEY_ATTR.to_string(),
            AttributeValue::S(key.partition_key.clone()),
        ),
        (
            SORT_KEY_ATTR.to_string(),
            AttributeValue::S(key.sort_key.clone()),
        ),
    ])
}

/// Reads the key attributes back out of an item.
pub fn key_from_attributes(item: &AttributeMap) -> Option<StorageKey> {
    let partition_key = item.get(PARTITION_KEY_ATTR)?.as_s().ok()?;
    let sort_key = item.get(SORT_KEY_ATTR)?.as_s().ok()?;
    Some(StorageKey::new(partition_key, sort_key))
}

/// Discriminator stored on an item, if any.
pub fn entity_type(item: &AttributeMap) -> Option<&str> {
    item.get(ENTITY_TYPE_ATTR)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
}

/// True when every filter entry equals a string attribute of the item.
///
/// Non-string attributes never match, the same way a DynamoDB filter
/// expression with a string operand behaves.
pub fn matches_filter(item: &AttributeMap, filter: &BTreeMap<String, String>) -> bool {
    filter.iter().all(|(field, expected)| {
        item.get(field)
            .and_then(|v| v.as_s().ok())
            .is_some_and(|actual| actual == expected)
    })
}
