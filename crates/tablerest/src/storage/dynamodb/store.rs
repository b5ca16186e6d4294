use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use tablerest_core::query::SortDirection;
use tablerest_core::storage::StorageKey;

use super::error::{map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error};
use super::expression::build_query_expression;
use crate::storage::kv::{
    key_from_attributes, key_to_attributes, AttributeMap, KeyValueStore, KvError, QueryPage,
    RangeQuery, PARTITION_KEY_ATTR, SORT_KEY_ATTR,
};

/// DynamoDB-backed key-value store.
///
/// Every resource kind shares the one table named at construction.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a store from application configuration.
    ///
    /// Uses the AWS SDK default credential chain. When `endpoint_url` is set
    /// (DynamoDB Local, LocalStack) requests go there instead of AWS.
    #[cfg(feature = "dynamodb")]
    pub async fn connect(config: &crate::config::DynamoDbConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<AttributeMap>, KvError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &self.table_name))?;

        Ok(result.item)
    }

    async fn query(&self, query: &RangeQuery) -> Result<QueryPage, KvError> {
        let expr = build_query_expression(query);

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(expr.key_condition)
            .set_filter_expression(expr.filter)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .scan_index_forward(query.direction == SortDirection::Ascending)
            .set_limit(query.limit.filter(|l| *l > 0))
            .set_exclusive_start_key(query.exclusive_start.as_ref().map(key_to_attributes))
            .send()
            .await
            .map_err(|e| map_query_error(e, &self.table_name))?;

        Ok(QueryPage {
            items: result.items.unwrap_or_default(),
            last_evaluated: result.last_evaluated_key.as_ref().and_then(key_from_attributes),
        })
    }

    async fn put(&self, item: AttributeMap) -> Result<(), KvError> {
        if !item.contains_key(PARTITION_KEY_ATTR) || !item.contains_key(SORT_KEY_ATTR) {
            return Err(KvError::Malformed("item is missing its key attributes".to_string()));
        }

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &self.table_name))?;

        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), KvError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &self.table_name))?;

        Ok(())
    }
}
