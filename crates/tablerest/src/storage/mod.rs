//! Storage backend implementations.
//!
//! Resources are persisted through [`SingleTableRepository`], which implements
//! the capability traits from `tablerest_core::storage` over any
//! [`KeyValueStore`]. The store the binary uses is selected at compile time
//! via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local store, nothing is persisted
//! - `dynamodb`: AWS DynamoDB store using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory store (default):
//! ```bash
//! cargo build -p tablerest
//! ```
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p tablerest --no-default-features --features dynamodb
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p tablerest --features inmemory"
);

pub mod codec;
pub mod dynamodb;
pub mod inmemory;
pub mod kv;
mod single_table;
mod traced;

pub use codec::{AttributeCodec, CodecError};
pub use dynamodb::DynamoDbStore;
pub use inmemory::InMemoryStore;
pub use kv::{AttributeMap, KeyValueStore, KvError, QueryPage, RangeQuery};
pub use single_table::{SingleTableRepository, DEFAULT_PAGE_SIZE};
pub use traced::TracedRepository;
