//! Query expression building.
//!
//! Attribute names are always aliased (`#pk`, `#sk`, `#f0`, ...) so that
//! filter fields colliding with DynamoDB reserved words stay valid.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::storage::kv::{RangeQuery, PARTITION_KEY_ATTR, SORT_KEY_ATTR};

/// Expressions and placeholders for one Query request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpression {
    pub key_condition: String,
    pub filter: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Builds the key condition and filter expressions for `query`.
pub fn build_query_expression(query: &RangeQuery) -> QueryExpression {
    let mut names = HashMap::from([
        ("#pk".to_string(), PARTITION_KEY_ATTR.to_string()),
        ("#sk".to_string(), SORT_KEY_ATTR.to_string()),
    ]);
    let mut values = HashMap::from([(
        ":pk".to_string(),
        AttributeValue::S(query.partition_key.clone()),
    )]);

    let key_condition = match &query.sort_key_prefix {
        Some(prefix) => {
            values.insert(":sk_prefix".to_string(), AttributeValue::S(prefix.clone()));
            "#pk = :pk AND begins_with(#sk, :sk_prefix)".to_string()
        }
        None => {
            names.remove("#sk");
            "#pk = :pk".to_string()
        }
    };

    let conditions: Vec<String> = query
        .filter
        .iter()
        .enumerate()
        .map(|(i, (field, expected))| {
            names.insert(format!("#f{i}"), field.clone());
            values.insert(format!(":f{i}"), AttributeValue::S(expected.clone()));
            format!("#f{i} = :f{i}")
        })
        .collect();

    let filter = (!conditions.is_empty()).then(|| conditions.join(" AND "));

    QueryExpression {
        key_condition,
        filter,
        names,
        values,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_key_condition_with_prefix() {
        let query = RangeQuery::new("item").with_sort_key_prefix("item#");
        let expr = build_query_expression(&query);

        assert_eq!(
            expr.key_condition,
            "#pk = :pk AND begins_with(#sk, :sk_prefix)"
        );
        assert_eq!(expr.names["#pk"], "PK");
        assert_eq!(expr.names["#sk"], "SK");
        assert_eq!(expr.values[":pk"].as_s().unwrap(), "item");
        assert_eq!(expr.values[":sk_prefix"].as_s().unwrap(), "item#");
        assert!(expr.filter.is_none());
    }

    #[test]
    fn test_key_condition_without_prefix_drops_unused_name() {
        let expr = build_query_expression(&RangeQuery::new("item"));

        assert_eq!(expr.key_condition, "#pk = :pk");
        assert!(!expr.names.contains_key("#sk"));
    }

    #[test]
    fn test_filter_conditions_are_aliased() {
        let filter = BTreeMap::from([
            ("color".to_string(), "red".to_string()),
            ("name".to_string(), "widget".to_string()),
        ]);
        let query = RangeQuery::new("item").with_filter(filter);
        let expr = build_query_expression(&query);

        assert_eq!(expr.filter.as_deref(), Some("#f0 = :f0 AND #f1 = :f1"));
        assert_eq!(expr.names["#f0"], "color");
        assert_eq!(expr.names["#f1"], "name");
        assert_eq!(expr.values[":f0"].as_s().unwrap(), "red");
        assert_eq!(expr.values[":f1"].as_s().unwrap(), "widget");
    }
}
