use async_trait::async_trait;

use crate::context::Context;
use crate::query::QueryOptions;

use super::Result;

/// Capability to create and replace resources.
#[async_trait]
pub trait Factory<T: Send + 'static>: Send + Sync {
    /// Stores a new resource and returns it as stored.
    async fn create(&self, ctx: &Context, resource: T) -> Result<T>;

    /// Replaces the resource identified by `id`.
    async fn update(&self, ctx: &Context, id: &str, resource: T) -> Result<T>;
}

/// Capability to read resources.
#[async_trait]
pub trait Reader<T: Send + 'static>: Send + Sync {
    /// Lists resources according to `opts`.
    async fn find_all(&self, ctx: &Context, opts: &QueryOptions) -> Result<Vec<T>>;

    /// Gets one resource by identifier. Absence is `Ok(None)`, not an error.
    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<T>>;

    /// Gets one resource by identifier, answering absence with `T::default()`.
    async fn find_by_id_or_default(&self, ctx: &Context, id: &str) -> Result<T>
    where
        T: Default,
    {
        Ok(self.find_by_id(ctx, id).await?.unwrap_or_default())
    }
}

/// Capability to delete resources.
#[async_trait]
pub trait Remover<T: Send + 'static>: Send + Sync {
    /// Deletes the resource identified by `id`. Deleting an absent resource succeeds.
    async fn delete(&self, ctx: &Context, id: &str) -> Result<()>;
}

/// Full CRUD capability: everything a REST controller can expose.
pub trait Crud<T: Send + 'static>: Factory<T> + Reader<T> + Remover<T> {}

impl<T, R> Crud<T> for R
where
    T: Send + 'static,
    R: Factory<T> + Reader<T> + Remover<T>,
{
}
