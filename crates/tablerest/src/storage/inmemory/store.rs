use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tablerest_core::query::SortDirection;
use tablerest_core::storage::StorageKey;
use tokio::sync::RwLock;

use crate::storage::kv::{
    key_from_attributes, matches_filter, AttributeMap, KeyValueStore, KvError, QueryPage,
    RangeQuery,
};

type Partition = BTreeMap<String, AttributeMap>;

/// In-memory store keyed by partition, then sort key.
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    partitions: Arc<RwLock<BTreeMap<String, Partition>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items across every partition.
    pub async fn len(&self) -> usize {
        self.partitions.read().await.values().map(BTreeMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<AttributeMap>, KvError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(&key.partition_key)
            .and_then(|partition| partition.get(&key.sort_key))
            .cloned())
    }

    async fn query(&self, query: &RangeQuery) -> Result<QueryPage, KvError> {
        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(&query.partition_key) else {
            return Ok(QueryPage::default());
        };

        let prefix = query.sort_key_prefix.as_deref().unwrap_or("");
        let start = query.exclusive_start.as_ref().map(|k| k.sort_key.as_str());

        let candidates: Vec<(&String, &AttributeMap)> = partition
            .iter()
            .filter(|(sort_key, _)| sort_key.starts_with(prefix))
            .collect();

        let ordered: Box<dyn Iterator<Item = (&String, &AttributeMap)> + '_> =
            match query.direction {
                SortDirection::Ascending => Box::new(
                    candidates
                        .into_iter()
                        .filter(move |(sk, _)| start.is_none_or(|s| sk.as_str() > s)),
                ),
                SortDirection::Descending => Box::new(
                    candidates
                        .into_iter()
                        .rev()
                        .filter(move |(sk, _)| start.is_none_or(|s| sk.as_str() < s)),
                ),
            };

        let mut remaining = ordered.peekable();
        let limit = query.limit.filter(|l| *l > 0).map(|l| l as usize);

        let mut evaluated = Vec::new();
        for (_, item) in remaining.by_ref() {
            evaluated.push(item);
            if limit.is_some_and(|l| evaluated.len() >= l) {
                break;
            }
        }

        let last_evaluated = if remaining.peek().is_some() {
            evaluated.last().and_then(|item| key_from_attributes(item))
        } else {
            None
        };

        Ok(QueryPage {
            items: evaluated
                .into_iter()
                .filter(|item| matches_filter(item, &query.filter))
                .cloned()
                .collect(),
            last_evaluated,
        })
    }

    async fn put(&self, item: AttributeMap) -> Result<(), KvError> {
        let key = key_from_attributes(&item)
            .ok_or_else(|| KvError::Malformed("item is missing its key attributes".to_string()))?;

        self.partitions
            .write()
            .await
            .entry(key.partition_key)
            .or_default()
            .insert(key.sort_key, item);
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), KvError> {
        let mut partitions = self.partitions.write().await;
        if let Some(partition) = partitions.get_mut(&key.partition_key) {
            partition.remove(&key.sort_key);
            if partition.is_empty() {
                partitions.remove(&key.partition_key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use aws_sdk_dynamodb::types::AttributeValue;

    use super::*;
    use crate::storage::kv::key_to_attributes;

    fn item(pk: &str, sk: &str, color: &str) -> AttributeMap {
        let mut item = key_to_attributes(&StorageKey::new(pk, sk));
        item.insert("color".to_string(), AttributeValue::S(color.to_string()));
        item
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (sk, color) in [
            ("item#a", "red"),
            ("item#b", "blue"),
            ("item#c", "red"),
            ("item#d", "blue"),
        ] {
            store.put(item("item", sk, color)).await.unwrap();
        }
        store.put(item("note", "note#a", "red")).await.unwrap();
        store
    }

    fn sort_keys(page: &QueryPage) -> Vec<String> {
        page.items
            .iter()
            .map(|i| i["SK"].as_s().unwrap().clone())
            .collect()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        store.put(item("item", "item#a", "red")).await.unwrap();

        let found = store
            .get(&StorageKey::new("item", "item#a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["color"].as_s().unwrap(), "red");
        assert!(store
            .get(&StorageKey::new("item", "item#z"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryStore::new();
        store.put(item("item", "item#a", "red")).await.unwrap();
        store.put(item("item", "item#a", "green")).await.unwrap();

        let found = store
            .get(&StorageKey::new("item", "item#a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["color"].as_s().unwrap(), "green");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_without_keys_is_rejected() {
        let store = InMemoryStore::new();
        let result = store.put(AttributeMap::new()).await;
        assert!(matches!(result, Err(KvError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_query_descending_by_default() {
        let store = seeded().await;
        let page = store.query(&RangeQuery::new("item")).await.unwrap();

        assert_eq!(
            sort_keys(&page),
            vec!["item#d", "item#c", "item#b", "item#a"]
        );
        assert_eq!(page.last_evaluated, None);
    }

    #[tokio::test]
    async fn test_query_ascending() {
        let store = seeded().await;
        let query = RangeQuery::new("item").with_direction(SortDirection::Ascending);
        let page = store.query(&query).await.unwrap();

        assert_eq!(
            sort_keys(&page),
            vec!["item#a", "item#b", "item#c", "item#d"]
        );
    }

    #[tokio::test]
    async fn test_query_limit_and_continuation() {
        let store = seeded().await;
        let first = store
            .query(&RangeQuery::new("item").with_limit(Some(3)))
            .await
            .unwrap();

        assert_eq!(sort_keys(&first), vec!["item#d", "item#c", "item#b"]);
        assert_eq!(
            first.last_evaluated,
            Some(StorageKey::new("item", "item#b"))
        );

        let second = store
            .query(
                &RangeQuery::new("item")
                    .with_limit(Some(3))
                    .with_exclusive_start(first.last_evaluated),
            )
            .await
            .unwrap();

        assert_eq!(sort_keys(&second), vec!["item#a"]);
        assert_eq!(second.last_evaluated, None);
    }

    #[tokio::test]
    async fn test_query_filter_applies_after_limit() {
        let store = seeded().await;
        let query = RangeQuery::new("item")
            .with_limit(Some(2))
            .with_filter(BTreeMap::from([("color".to_string(), "red".to_string())]));

        let page = store.query(&query).await.unwrap();

        assert_eq!(sort_keys(&page), vec!["item#c"]);
        assert_eq!(page.last_evaluated, Some(StorageKey::new("item", "item#c")));
    }

    #[tokio::test]
    async fn test_query_sort_key_prefix() {
        let store = InMemoryStore::new();
        store.put(item("doc", "doc#comment#1", "red")).await.unwrap();
        store.put(item("doc", "doc#meta", "red")).await.unwrap();

        let page = store
            .query(&RangeQuery::new("doc").with_sort_key_prefix("doc#comment#"))
            .await
            .unwrap();

        assert_eq!(sort_keys(&page), vec!["doc#comment#1"]);
    }

    #[tokio::test]
    async fn test_query_missing_partition_is_empty() {
        let store = seeded().await;
        let page = store.query(&RangeQuery::new("nothing")).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.last_evaluated, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded().await;
        store
            .delete(&StorageKey::new("note", "note#a"))
            .await
            .unwrap();
        store
            .delete(&StorageKey::new("note", "note#missing"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 4);
        assert!(store
            .get(&StorageKey::new("note", "note#a"))
            .await
            .unwrap()
            .is_none());
    }
}
