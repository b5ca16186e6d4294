use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use tablerest_core::storage::Resource;

use crate::storage::codec::{get_number, get_optional_string, get_string};
use crate::storage::{AttributeCodec, AttributeMap, CodecError};

/// A catalogue item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub quantity: u32,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            quantity: 0,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Resource for Item {
    const KIND: &'static str = "item";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AttributeCodec for Item {
    fn to_item(&self) -> Result<AttributeMap, CodecError> {
        let mut item = AttributeMap::new();
        item.insert("id".to_string(), AttributeValue::S(self.id.clone()));
        item.insert("name".to_string(), AttributeValue::S(self.name.clone()));
        item.insert(
            "quantity".to_string(),
            AttributeValue::N(self.quantity.to_string()),
        );
        if let Some(color) = &self.color {
            item.insert("color".to_string(), AttributeValue::S(color.clone()));
        }
        Ok(item)
    }

    fn from_item(item: &AttributeMap) -> Result<Self, CodecError> {
        Ok(Self {
            id: get_string(item, "id")?,
            name: get_string(item, "name")?,
            color: get_optional_string(item, "color"),
            quantity: get_number(item, "quantity")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_round_trip() {
        let item = Item {
            quantity: 3,
            ..Item::new("a1", "widget").with_color("red")
        };

        let encoded = item.to_item().unwrap();

        assert_eq!(encoded["quantity"].as_n().unwrap(), "3");
        assert_eq!(Item::from_item(&encoded).unwrap(), item);
    }

    #[test]
    fn test_json_defaults() {
        let item: Item = serde_json::from_str(r#"{"id":"a1","name":"widget"}"#).unwrap();

        assert_eq!(item, Item::new("a1", "widget"));
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"id":"a1","name":"widget","quantity":0}"#
        );
    }

    #[test]
    fn test_from_item_requires_name() {
        let mut encoded = Item::new("a1", "widget").to_item().unwrap();
        encoded.remove("name");

        assert_eq!(
            Item::from_item(&encoded),
            Err(CodecError::MissingField("name".to_string()))
        );
    }
}
