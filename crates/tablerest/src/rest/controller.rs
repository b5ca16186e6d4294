use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tablerest_core::storage::{Crud, Resource};

use super::handle::Handle;

/// An ordered group of handles mounted under one root path.
#[derive(Debug)]
pub struct Controller {
    name: String,
    root: String,
    handles: Vec<Handle>,
}

impl Controller {
    pub fn new(name: impl Into<String>, root: impl Into<String>, handles: Vec<Handle>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            handles,
        }
    }

    /// Full CRUD controller over `repository`.
    ///
    /// Registers, in order: create, find by id, find all, update, delete.
    pub fn crud<T, R>(name: impl Into<String>, root: impl Into<String>, repository: Arc<R>) -> Self
    where
        T: Resource + Serialize + DeserializeOwned,
        R: Crud<T> + ?Sized + 'static,
    {
        let name = name.into();
        let handles = vec![
            Handle::create::<T, R>(format!("{name}.create"), Arc::clone(&repository)),
            Handle::find_by_id::<T, R>(format!("{name}.find_by_id"), Arc::clone(&repository)),
            Handle::find_all::<T, R>(format!("{name}.find_all"), Arc::clone(&repository)),
            Handle::update::<T, R>(format!("{name}.update"), Arc::clone(&repository)),
            Handle::delete::<T, R>(format!("{name}.delete"), repository),
        ];
        Self::new(name, root, handles)
    }

    /// Appends a handle after the existing ones.
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handles.push(handle);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Full route path of `handle` under this controller.
    pub fn full_path(&self, handle: &Handle) -> String {
        join_path(&self.root, handle.path())
    }

    pub(crate) fn into_handles(self) -> (String, String, Vec<Handle>) {
        (self.name, self.root, self.handles)
    }
}

/// Joins a controller root and a handle path into an absolute route path.
pub(crate) fn join_path(root: &str, path: &str) -> String {
    let segments: Vec<&str> = [root, path]
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::rest::handle::Verb;
    use crate::storage::{InMemoryStore, SingleTableRepository};

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("items", ""), "/items");
        assert_eq!(join_path("/items/", "{id}"), "/items/{id}");
        assert_eq!(join_path("items/special", "/{id}"), "/items/special/{id}");
        assert_eq!(join_path("", ""), "/");
    }

    #[test]
    fn test_crud_controller_handles() {
        let repository = Arc::new(SingleTableRepository::<Item, _>::new(InMemoryStore::new()));
        let controller = Controller::crud::<Item, _>("items", "items", repository);

        let routes: Vec<(String, Verb)> = controller
            .handles()
            .iter()
            .map(|h| (controller.full_path(h), h.verb()))
            .collect();

        assert_eq!(
            routes,
            vec![
                ("/items".to_string(), Verb::Post),
                ("/items/{id}".to_string(), Verb::Get),
                ("/items".to_string(), Verb::Get),
                ("/items/{id}".to_string(), Verb::Put),
                ("/items/{id}".to_string(), Verb::Delete),
            ]
        );
        assert_eq!(controller.handles()[0].name(), "items.create");
    }
}
