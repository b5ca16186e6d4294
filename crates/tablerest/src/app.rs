use std::sync::Arc;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::Config,
    context::attach_context,
    health::livez,
    models::{Item, Note},
    rest::{Controller, RestRouter},
    storage::{KeyValueStore, SingleTableRepository, TracedRepository},
};

/// Create the application router with all routes and middleware.
///
/// Every resource kind is stored through `store`, so they all share one table.
pub fn create_app<S>(config: &Config, store: S) -> Router
where
    S: KeyValueStore + Clone + 'static,
{
    let items = TracedRepository::new(
        "items",
        Arc::new(
            SingleTableRepository::<Item, _>::new(store.clone())
                .with_page_size(config.default_page_size),
        ),
    );
    let notes = TracedRepository::new(
        "notes",
        Arc::new(
            SingleTableRepository::<Note, _>::new(store)
                .with_page_size(config.default_page_size),
        ),
    );

    let api = RestRouter::new(config.cors())
        .mount(Controller::crud::<Item, _>("items", "items", Arc::new(items)))
        .mount(Controller::crud::<Note, _>("notes", "notes", Arc::new(notes)))
        .into_router();

    Router::new()
        .route("/livez", get(livez))
        .merge(api)
        .layer(middleware::from_fn_with_state(
            config.context_settings(),
            attach_context,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.server_timeout(),
        ))
}
