//! Traced repository decorator.
//!
//! Wraps any capability implementation and logs each call with the request
//! id, caller identity, elapsed time and outcome.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tablerest_core::query::QueryOptions;
use tablerest_core::storage::{Factory, Reader, Remover, Result};
use tablerest_core::Context;

/// Logging decorator over a repository.
///
/// Delegates every call unchanged to the wrapped repository, so it can be
/// stacked over any `Factory`, `Reader` or `Remover` without changing results.
pub struct TracedRepository<R> {
    name: &'static str,
    repository: Arc<R>,
}

impl<R> TracedRepository<R> {
    /// Creates a new decorator. `name` labels every log line.
    pub fn new(name: &'static str, repository: Arc<R>) -> Self {
        Self { name, repository }
    }

    fn record<T>(
        &self,
        ctx: &Context,
        operation: &'static str,
        started: Instant,
        result: &Result<T>,
    ) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let identity = ctx.identity().unwrap_or("-");
        match result {
            Ok(_) => tracing::debug!(
                repository = self.name,
                operation,
                request_id = %ctx.request_id(),
                identity,
                elapsed_ms,
                "Repository call succeeded"
            ),
            Err(err) => tracing::warn!(
                repository = self.name,
                operation,
                request_id = %ctx.request_id(),
                identity,
                elapsed_ms,
                error = %err,
                "Repository call failed"
            ),
        }
    }
}

#[async_trait]
impl<T, R> Reader<T> for TracedRepository<R>
where
    T: Send + 'static,
    R: Reader<T> + 'static,
{
    async fn find_all(&self, ctx: &Context, opts: &QueryOptions) -> Result<Vec<T>> {
        let started = Instant::now();
        let result = self.repository.find_all(ctx, opts).await;
        if let Ok(items) = &result {
            tracing::trace!(repository = self.name, count = items.len(), "Listed resources");
        }
        self.record(ctx, "find_all", started, &result);
        result
    }

    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<T>> {
        let started = Instant::now();
        let result = self.repository.find_by_id(ctx, id).await;
        if let Ok(None) = &result {
            tracing::trace!(repository = self.name, id, "Resource absent");
        }
        self.record(ctx, "find_by_id", started, &result);
        result
    }
}

#[async_trait]
impl<T, R> Factory<T> for TracedRepository<R>
where
    T: Send + 'static,
    R: Factory<T> + 'static,
{
    async fn create(&self, ctx: &Context, resource: T) -> Result<T> {
        let started = Instant::now();
        let result = self.repository.create(ctx, resource).await;
        self.record(ctx, "create", started, &result);
        result
    }

    async fn update(&self, ctx: &Context, id: &str, resource: T) -> Result<T> {
        let started = Instant::now();
        let result = self.repository.update(ctx, id, resource).await;
        self.record(ctx, "update", started, &result);
        result
    }
}

#[async_trait]
impl<T, R> Remover<T> for TracedRepository<R>
where
    T: Send + 'static,
    R: Remover<T> + 'static,
{
    async fn delete(&self, ctx: &Context, id: &str) -> Result<()> {
        let started = Instant::now();
        let result = self.repository.delete(ctx, id).await;
        self.record(ctx, "delete", started, &result);
        result
    }
}
