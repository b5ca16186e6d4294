//! Resources served by the binary.
//!
//! Both kinds live in the same table and are told apart by partition key
//! and `entityType`.

mod item;
mod note;

pub use item::Item;
pub use note::Note;
