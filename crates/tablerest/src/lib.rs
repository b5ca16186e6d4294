//! Expose typed resources as REST endpoints over a single-table store.
//!
//! Resources implement [`Resource`](tablerest_core::storage::Resource) and
//! [`AttributeCodec`](storage::AttributeCodec), get a
//! [`SingleTableRepository`](storage::SingleTableRepository) over a
//! [`KeyValueStore`](storage::KeyValueStore), and are mounted with
//! [`Controller::crud`](rest::Controller::crud).

pub mod app;
pub mod config;
pub mod context;
pub mod health;
pub mod models;
pub mod rest;
pub mod storage;

pub use app::create_app;
pub use config::{Config, DynamoDbConfig};
