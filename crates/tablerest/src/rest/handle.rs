//! Handles: one endpoint bound to one verb and a path relative to its
//! controller.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery},
    handler::Handler,
    http::StatusCode,
    routing::{on, MethodFilter, MethodRouter},
};
use serde::{de::DeserializeOwned, Serialize};
use tablerest_core::storage::{Factory, Reader, Remover, Resource};
use tablerest_core::{Context, Error};

use super::params::ListParams;
use super::response::{ApiError, JsonResponse};
use crate::context::RequestContext;

/// Path segment capturing a resource identifier.
pub const ID_SEGMENT: &str = "{id}";

/// HTTP verbs a handle can be bound to. OPTIONS is always implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }

    pub fn method_filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Head => MethodFilter::HEAD,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Patch => MethodFilter::PATCH,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named endpoint.
///
/// `path` is relative to the controller root; an empty path is the root itself.
pub struct Handle {
    name: String,
    path: String,
    verb: Verb,
    endpoint: MethodRouter,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("verb", &self.verb)
            .finish_non_exhaustive()
    }
}

impl Handle {
    /// Binds any axum handler to `verb` at `path`.
    pub fn new<H, T>(
        name: impl Into<String>,
        path: impl Into<String>,
        verb: Verb,
        handler: H,
    ) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            name: name.into(),
            path: path.into(),
            verb,
            endpoint: on(verb.method_filter(), handler),
        }
    }

    /// `GET {id}`: 200 with the resource, 404 when absent.
    pub fn find_by_id<T, R>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource + Serialize,
        R: Reader<T> + ?Sized + 'static,
    {
        let handler = move |RequestContext(ctx): RequestContext, Path(id): Path<String>| {
            let repository = Arc::clone(&repository);
            async move { find_one::<T, R>(&*repository, &ctx, &id).await }
        };
        Self::new(name, ID_SEGMENT, Verb::Get, handler)
    }

    /// `GET` at the root: 200 with a JSON array, 400 on a malformed query.
    ///
    /// `limit` bounds the items read, not the items returned: filters apply
    /// to each page after it is read, so a filtered page may come back short
    /// or empty while later pages still match. Pass `limit=-1` to read every
    /// page when filtering.
    pub fn find_all<T, R>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource + Serialize,
        R: Reader<T> + ?Sized + 'static,
    {
        let handler = move |RequestContext(ctx): RequestContext, RawQuery(query): RawQuery| {
            let repository = Arc::clone(&repository);
            async move { find_many::<T, R>(&*repository, &ctx, query.as_deref()).await }
        };
        Self::new(name, "", Verb::Get, handler)
    }

    /// `POST` at the root: 201 with the stored resource, 400 on a malformed body.
    pub fn create<T, R>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource + Serialize + DeserializeOwned,
        R: Factory<T> + ?Sized + 'static,
    {
        let handler = move |RequestContext(ctx): RequestContext, body: Bytes| {
            let repository = Arc::clone(&repository);
            async move { create_one::<T, R>(&*repository, &ctx, &body).await }
        };
        Self::new(name, "", Verb::Post, handler)
    }

    /// `PUT {id}`: 200 with the stored resource. The body id must match the path.
    pub fn update<T, R>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource + Serialize + DeserializeOwned,
        R: Factory<T> + ?Sized + 'static,
    {
        let handler =
            move |RequestContext(ctx): RequestContext, Path(id): Path<String>, body: Bytes| {
                let repository = Arc::clone(&repository);
                async move { update_one::<T, R>(&*repository, &ctx, &id, &body).await }
            };
        Self::new(name, ID_SEGMENT, Verb::Put, handler)
    }

    /// `DELETE {id}`: 204.
    pub fn delete<T, R>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource,
        R: Remover<T> + ?Sized + 'static,
    {
        let handler = move |RequestContext(ctx): RequestContext, Path(id): Path<String>| {
            let repository = Arc::clone(&repository);
            async move { delete_one::<T, R>(&*repository, &ctx, &id).await }
        };
        Self::new(name, ID_SEGMENT, Verb::Delete, handler)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub(crate) fn into_endpoint(self) -> MethodRouter {
        self.endpoint
    }
}

async fn find_one<T, R>(
    repository: &R,
    ctx: &Context,
    id: &str,
) -> Result<JsonResponse<T>, ApiError>
where
    T: Resource + Serialize,
    R: Reader<T> + ?Sized,
{
    match repository.find_by_id(ctx, id).await {
        Ok(Some(resource)) => Ok(JsonResponse::ok(resource)),
        Ok(None) => Err(ApiError::new(
            Error::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            },
            "resource not found",
        )),
        Err(err) => Err(ApiError::new(err, "unable to find resource")),
    }
}

async fn find_many<T, R>(
    repository: &R,
    ctx: &Context,
    query: Option<&str>,
) -> Result<JsonResponse<Vec<T>>, ApiError>
where
    T: Resource + Serialize,
    R: Reader<T> + ?Sized,
{
    let options = ListParams::from_query(query)
        .map_err(|err| ApiError::new(err, "invalid query"))?
        .into_options()
        .map_err(|err| ApiError::new(err, "invalid query"))?;

    let resources = repository
        .find_all(ctx, &options)
        .await
        .map_err(|err| ApiError::new(err, "unable to find resource"))?;

    Ok(JsonResponse::ok(resources))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::new(Error::Decode(err.to_string()), "invalid resource"))
}

async fn create_one<T, R>(
    repository: &R,
    ctx: &Context,
    body: &[u8],
) -> Result<JsonResponse<T>, ApiError>
where
    T: Resource + Serialize + DeserializeOwned,
    R: Factory<T> + ?Sized,
{
    let resource: T = decode(body)?;

    let created = repository
        .create(ctx, resource)
        .await
        .map_err(|err| ApiError::new(err, "unable to create resource"))?;

    Ok(JsonResponse::created(created))
}

async fn update_one<T, R>(
    repository: &R,
    ctx: &Context,
    id: &str,
    body: &[u8],
) -> Result<JsonResponse<T>, ApiError>
where
    T: Resource + Serialize + DeserializeOwned,
    R: Factory<T> + ?Sized,
{
    let resource: T = decode(body)?;
    if resource.id() != id {
        return Err(ApiError::new(
            Error::Decode(format!("body id {} does not match path id {id}", resource.id())),
            "invalid resource",
        ));
    }

    let updated = repository
        .update(ctx, id, resource)
        .await
        .map_err(|err| ApiError::new(err, "unable to update resource"))?;

    Ok(JsonResponse::ok(updated))
}

async fn delete_one<T, R>(repository: &R, ctx: &Context, id: &str) -> Result<StatusCode, ApiError>
where
    T: Resource,
    R: Remover<T> + ?Sized,
{
    repository
        .delete(ctx, id)
        .await
        .map_err(|err| ApiError::new(err, "unable to delete resource"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_names() {
        assert_eq!(Verb::Get.to_string(), "GET");
        assert_eq!(Verb::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_custom_handle_keeps_metadata() {
        let handle = Handle::new("ping", "ping", Verb::Post, || async { StatusCode::ACCEPTED });

        assert_eq!(handle.name(), "ping");
        assert_eq!(handle.path(), "ping");
        assert_eq!(handle.verb(), Verb::Post);
    }
}
