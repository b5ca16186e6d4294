use std::fmt;

/// Separator between a kind prefix and an identifier in sort keys.
pub const KEY_SEPARATOR: &str = "#";

/// Composite key locating one item in a single-table store.
///
/// The partition key is stable per resource kind, which keeps one logical
/// collection per partition. The sort key is unique within the partition and
/// orders items for range scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl StorageKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.sort_key)
    }
}

/// A domain type that can live in a single-table store.
///
/// Implementors pick a short discriminator (`KIND`) and expose their
/// identifier; the key layout is derived from those two. The defaults put
/// every item of a kind under partition `KIND` with sort key `KIND#<id>`.
/// Kinds that share a partition with others, or that need hierarchical sort
/// keys, override [`Resource::partition_key`] and [`Resource::sort_key_prefix`].
///
/// # Examples
///
/// ```
/// use tablerest_core::storage::{Resource, StorageKey};
///
/// struct Item {
///     id: String,
/// }
///
/// impl Resource for Item {
///     const KIND: &'static str = "item";
///
///     fn id(&self) -> &str {
///         &self.id
///     }
/// }
///
/// let item = Item { id: "a1".to_string() };
/// assert_eq!(item.storage_key(), StorageKey::new("item", "item#a1"));
/// assert_eq!(Item::key_for("a1"), item.storage_key());
/// ```
pub trait Resource: Send + Sync + 'static {
    /// Discriminator identifying this kind inside a shared table.
    const KIND: &'static str;

    /// Identifier of this instance, unique within its kind.
    fn id(&self) -> &str;

    /// Partition holding every item of this kind.
    fn partition_key() -> String {
        Self::KIND.to_string()
    }

    /// Prefix shared by the sort keys of every item of this kind.
    fn sort_key_prefix() -> String {
        format!("{}{KEY_SEPARATOR}", Self::KIND)
    }

    /// Sort key for the item with identifier `id`.
    fn sort_key_for(id: &str) -> String {
        format!("{}{id}", Self::sort_key_prefix())
    }

    /// Key for a point lookup by identifier.
    fn key_for(id: &str) -> StorageKey {
        StorageKey::new(Self::partition_key(), Self::sort_key_for(id))
    }

    /// Key this instance is written under.
    fn storage_key(&self) -> StorageKey {
        Self::key_for(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: String,
    }

    impl Resource for Item {
        const KIND: &'static str = "item";

        fn id(&self) -> &str {
            &self.id
        }
    }

    /// Comments live under their document's partition.
    struct Comment {
        id: String,
    }

    impl Resource for Comment {
        const KIND: &'static str = "comment";

        fn id(&self) -> &str {
            &self.id
        }

        fn partition_key() -> String {
            "doc".to_string()
        }

        fn sort_key_prefix() -> String {
            "doc#comment#".to_string()
        }
    }

    #[test]
    fn test_default_key_layout() {
        let item = Item {
            id: "a1".to_string(),
        };

        let key = item.storage_key();
        assert_eq!(key.partition_key, "item");
        assert_eq!(key.sort_key, "item#a1");
    }

    #[test]
    fn test_key_for_matches_instance_key() {
        let item = Item {
            id: "b2".to_string(),
        };
        assert_eq!(Item::key_for("b2"), item.storage_key());
    }

    #[test]
    fn test_partition_key_is_stable_per_kind() {
        assert_eq!(Item::key_for("a").partition_key, Item::key_for("z").partition_key);
        assert_ne!(Item::key_for("a").sort_key, Item::key_for("z").sort_key);
    }

    #[test]
    fn test_overridden_key_layout() {
        let comment = Comment {
            id: "c9".to_string(),
        };

        assert_eq!(
            comment.storage_key(),
            StorageKey::new("doc", "doc#comment#c9")
        );
        assert!(Comment::sort_key_for("c9").starts_with(&Comment::sort_key_prefix()));
    }

    #[test]
    fn test_storage_key_display() {
        assert_eq!(StorageKey::new("item", "item#a1").to_string(), "item/item#a1");
    }
}
