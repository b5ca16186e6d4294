use std::collections::HashMap;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::MethodRouter,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::controller::{join_path, Controller};
use super::handle::Verb;

/// Cross-origin policy applied to every mounted route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Allows any origin.
    pub fn any() -> Self {
        Self::default()
    }

    /// Allows only the listed origins. An empty list allows any origin.
    pub fn with_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::OPTIONS,
                Method::DELETE,
            ])
            .allow_headers([
                HeaderName::from_static("x-requested-with"),
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
            ]);

        if self.allowed_origins.is_empty() {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Builder collecting controllers into one axum router.
///
/// Controllers are mounted in order. When two handles resolve to the same
/// path and verb, the first one mounted is kept. Captures match by position,
/// so `items/{id}` and `items/{slug}` are the same path and the capture names
/// of the first one mounted apply to both.
#[derive(Debug, Default)]
pub struct RestRouter {
    cors: CorsConfig,
    controllers: Vec<Controller>,
}

impl RestRouter {
    pub fn new(cors: CorsConfig) -> Self {
        Self {
            cors,
            controllers: Vec::new(),
        }
    }

    pub fn mount(mut self, controller: Controller) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// Builds the router.
    ///
    /// The CORS layer wraps every mounted path, so OPTIONS is answered on
    /// each of them without a handle of its own. Unknown paths stay 404.
    pub fn into_router(self) -> Router {
        let cors = self.cors.layer();
        let routes = route_table(self.controllers);
        if routes.is_empty() {
            return Router::new();
        }

        routes
            .into_iter()
            .fold(Router::new(), |router, route| {
                router.route(&route.path, route.endpoint)
            })
            .route_layer(cors)
    }
}

struct Route {
    path: String,
    verbs: Vec<Verb>,
    endpoint: MethodRouter,
}

/// Flattens controllers into one route per path, in first-seen order.
fn route_table(controllers: Vec<Controller>) -> Vec<Route> {
    let mut routes: Vec<Route> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for controller in controllers {
        let (controller_name, root, handles) = controller.into_handles();
        for handle in handles {
            let path = join_path(&root, handle.path());
            let verb = handle.verb();

            let slot = *index.entry(route_key(&path)).or_insert_with(|| {
                routes.push(Route {
                    path: path.clone(),
                    verbs: Vec::new(),
                    endpoint: MethodRouter::new(),
                });
                routes.len() - 1
            });
            let route = &mut routes[slot];

            if route.verbs.contains(&verb) {
                tracing::warn!(
                    controller = %controller_name,
                    handle = %handle.name(),
                    %path,
                    %verb,
                    "Route already mounted, skipping handle"
                );
                continue;
            }

            tracing::debug!(
                controller = %controller_name,
                handle = %handle.name(),
                %path,
                %verb,
                "Mounted route"
            );
            route.verbs.push(verb);
            let endpoint = std::mem::replace(&mut route.endpoint, MethodRouter::new());
            route.endpoint = endpoint.merge(handle.into_endpoint());
        }
    }

    routes
}

/// Path with every capture name erased. `{*rest}` stays distinct from `{id}`.
fn route_key(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix('{') {
            Some(capture) if segment.ends_with('}') => {
                if capture.starts_with('*') {
                    "{*}"
                } else {
                    "{}"
                }
            }
            _ => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}
