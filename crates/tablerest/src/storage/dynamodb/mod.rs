//! DynamoDB storage backend.
//!
//! Implements [`KeyValueStore`](crate::storage::kv::KeyValueStore) over a
//! single DynamoDB table with string `PK`/`SK` keys.

mod error;
mod expression;
mod store;

pub use expression::{build_query_expression, QueryExpression};
pub use store::DynamoDbStore;
