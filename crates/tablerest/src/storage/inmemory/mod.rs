//! In-memory key-value store.
//!
//! Mirrors the DynamoDB semantics the single-table adapter relies on: sorted
//! sort keys per partition, `Limit` applied before filters, and a
//! last-evaluated key when a limited page stops early. Data is not persisted.

mod store;

pub use store::InMemoryStore;
