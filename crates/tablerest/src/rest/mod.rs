//! REST exposition layer.
//!
//! Capability implementations are wrapped in [`Handle`]s, grouped under a
//! root path by [`Controller`]s and mounted into one axum router by
//! [`RestRouter`].
//!
//! ```ignore
//! let router = RestRouter::new(CorsConfig::any())
//!     .mount(Controller::crud::<Item, _>("items", "items", repository))
//!     .into_router();
//! ```

mod controller;
mod handle;
mod params;
mod response;
mod router;

pub use controller::Controller;
pub use handle::{Handle, Verb, ID_SEGMENT};
pub use params::ListParams;
pub use response::{ApiError, JsonResponse, JSON_CONTENT_TYPE};
pub use router::{CorsConfig, RestRouter};
