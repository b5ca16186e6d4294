//! Single-table repository.
//!
//! Implements the capability traits from `tablerest_core::storage` for any
//! resource kind against a [`KeyValueStore`]. Several kinds share one table;
//! each one is kept apart by its partition key, sort-key prefix and the
//! `entityType` discriminator attribute.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tablerest_core::query::{Pagination, QueryOptions};
use tablerest_core::storage::{Factory, Reader, Remover, Resource, Result, StorageKey, StoreError};
use tablerest_core::Context;

use super::codec::{AttributeCodec, CodecError};
use super::kv::{
    entity_type, AttributeMap, KeyValueStore, KvError, RangeQuery, ENTITY_TYPE_ATTR,
    PARTITION_KEY_ATTR, SORT_KEY_ATTR,
};

/// Page size used when a list request does not ask for one.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Sort field that controls the scan direction over sort keys.
pub const SORT_KEY_FIELD: &str = "id";

/// Generic repository storing `T` in a single table.
pub struct SingleTableRepository<T, S> {
    store: S,
    page_size: i32,
    _resource: PhantomData<fn() -> T>,
}

impl<T, S> SingleTableRepository<T, S>
where
    T: Resource + AttributeCodec,
    S: KeyValueStore,
{
    /// Creates a new repository over `store` with the default page size.
    pub fn new(store: S) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
            _resource: PhantomData,
        }
    }

    /// Overrides the page size used when a request does not specify a limit.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Builds the range query a list request translates to.
    fn range_query(&self, opts: &QueryOptions) -> RangeQuery {
        let direction = opts.direction_for(SORT_KEY_FIELD).unwrap_or_default();
        let exclusive_start = opts.pagination.cursor.as_deref().map(T::key_for);

        RangeQuery::new(T::partition_key())
            .with_sort_key_prefix(T::sort_key_prefix())
            .with_direction(direction)
            .with_limit(page_limit(&opts.pagination, self.page_size))
            .with_exclusive_start(exclusive_start)
            .with_filter(opts.filter.clone())
    }

    /// Encodes `resource` and stamps the key and discriminator attributes.
    fn encode(resource: &T, key: StorageKey) -> std::result::Result<AttributeMap, CodecError> {
        let mut item = resource.to_item()?;
        item.insert(
            PARTITION_KEY_ATTR.to_string(),
            AttributeValue::S(key.partition_key),
        );
        item.insert(SORT_KEY_ATTR.to_string(), AttributeValue::S(key.sort_key));
        item.entry(ENTITY_TYPE_ATTR.to_string())
            .or_insert_with(|| AttributeValue::S(T::KIND.to_string()));
        Ok(item)
    }
}

/// Translates pagination into a per-query limit.
///
/// A negative limit disables paging (`None`, every page is read), zero falls
/// back to `default_size`, and positive limits are used as given.
fn page_limit(pagination: &Pagination, default_size: i32) -> Option<i32> {
    if pagination.limit_override {
        None
    } else if pagination.limit == 0 {
        Some(default_size)
    } else {
        Some(pagination.limit)
    }
}

/// True when `item` was written by kind `T`, or carries no discriminator.
fn is_kind<T: Resource>(item: &AttributeMap) -> bool {
    entity_type(item).is_none_or(|kind| kind == T::KIND)
}

/// Runs a store call within the request deadline.
async fn within<F, O>(ctx: &Context, call: F) -> std::result::Result<O, KvError>
where
    F: Future<Output = std::result::Result<O, KvError>>,
{
    if ctx.is_expired() {
        return Err(KvError::DeadlineExceeded);
    }
    match ctx.deadline() {
        Some(deadline) => {
            tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call)
                .await
                .map_err(|_| KvError::DeadlineExceeded)?
        }
        None => call.await,
    }
}

#[async_trait]
impl<T, S> Reader<T> for SingleTableRepository<T, S>
where
    T: Resource + AttributeCodec,
    S: KeyValueStore,
{
    async fn find_all(&self, ctx: &Context, opts: &QueryOptions) -> Result<Vec<T>> {
        let fetch_all_error = |reason: String| StoreError::FetchAll {
            kind: T::KIND,
            reason,
        };

        let mut query = self.range_query(opts);
        let mut items = Vec::new();
        loop {
            let page = match within(ctx, self.store.query(&query)).await {
                Ok(page) => page,
                Err(err) if err.is_not_found() => {
                    tracing::debug!(kind = T::KIND, "No resources found");
                    return Ok(Vec::new());
                }
                Err(err) => {
                    tracing::error!(kind = T::KIND, error = %err, "Unable to fetch all");
                    return Err(fetch_all_error(err.to_string()));
                }
            };

            items.extend(page.items.into_iter().filter(is_kind::<T>));

            match (query.limit, page.last_evaluated) {
                (None, Some(next)) => query.exclusive_start = Some(next),
                _ => break,
            }
        }

        T::from_items(&items).map_err(|err| {
            tracing::error!(kind = T::KIND, error = %err, "Unable to decode items");
            fetch_all_error(err.to_string())
        })
    }

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<T>> {
        let fetch_error = |reason: String| StoreError::Fetch {
            kind: T::KIND,
            reason,
        };

        let item = match within(ctx, self.store.get(&T::key_for(id))).await {
            Ok(Some(item)) if is_kind::<T>(&item) => item,
            Ok(_) => {
                tracing::debug!(kind = T::KIND, id, "Resource not found");
                return Ok(None);
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(kind = T::KIND, id, "No resources found");
                return Ok(None);
            }
            Err(err) => {
                tracing::error!(kind = T::KIND, id, error = %err, "Unable to fetch");
                return Err(fetch_error(err.to_string()));
            }
        };

        T::from_item(&item).map(Some).map_err(|err| {
            tracing::error!(kind = T::KIND, id, error = %err, "Unable to decode item");
            fetch_error(err.to_string())
        })
    }
}

#[async_trait]
impl<T, S> Factory<T> for SingleTableRepository<T, S>
where
    T: Resource + AttributeCodec,
    S: KeyValueStore,
{
    async fn create(&self, ctx: &Context, resource: T) -> Result<T> {
        let insert_error = |reason: String| StoreError::Insert {
            kind: T::KIND,
            reason,
        };

        let item = Self::encode(&resource, resource.storage_key()).map_err(|err| {
            tracing::error!(
                kind = T::KIND,
                id = resource.id(),
                error = %err,
                "Unable to encode item"
            );
            insert_error(err.to_string())
        })?;

        within(ctx, self.store.put(item)).await.map_err(|err| {
            tracing::error!(kind = T::KIND, id = resource.id(), error = %err, "Unable to put item");
            insert_error(err.to_string())
        })?;

        tracing::info!(kind = T::KIND, id = resource.id(), "Created resource");
        Ok(resource)
    }

    async fn update(&self, ctx: &Context, id: &str, resource: T) -> Result<T> {
        let update_error = |reason: String| StoreError::Update {
            kind: T::KIND,
            reason,
        };

        let item = Self::encode(&resource, T::key_for(id)).map_err(|err| {
            tracing::error!(kind = T::KIND, id, error = %err, "Unable to encode item");
            update_error(err.to_string())
        })?;

        within(ctx, self.store.put(item)).await.map_err(|err| {
            tracing::error!(kind = T::KIND, id, error = %err, "Unable to put item");
            update_error(err.to_string())
        })?;

        tracing::info!(kind = T::KIND, id, "Updated resource");
        Ok(resource)
    }
}

#[async_trait]
impl<T, S> Remover<T> for SingleTableRepository<T, S>
where
    T: Resource + AttributeCodec,
    S: KeyValueStore,
{
    async fn delete(&self, ctx: &Context, id: &str) -> Result<()> {
        within(ctx, self.store.delete(&T::key_for(id)))
            .await
            .map_err(|err| {
                tracing::error!(kind = T::KIND, id, error = %err, "Unable to delete item");
                StoreError::Delete {
                    kind: T::KIND,
                    reason: err.to_string(),
                }
            })?;

        tracing::info!(kind = T::KIND, id, "Deleted resource");
        Ok(())
    }
}
