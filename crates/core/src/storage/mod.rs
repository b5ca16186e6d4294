mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use http_mapping::error_to_status_code;
pub use traits::{Crud, Factory, Reader, Remover};
pub use types::{Resource, StorageKey};
