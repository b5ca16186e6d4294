use serde::{Deserialize, Serialize};
use tablerest_core::storage::Resource;

use crate::storage::codec::{serde_from_item, serde_to_item};
use crate::storage::{AttributeCodec, AttributeMap, CodecError};

/// A free-form note. Stored through the serde bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Resource for Note {
    const KIND: &'static str = "note";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AttributeCodec for Note {
    fn to_item(&self) -> Result<AttributeMap, CodecError> {
        serde_to_item(self)
    }

    fn from_item(item: &AttributeMap) -> Result<Self, CodecError> {
        serde_from_item(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_round_trip() {
        let note = Note {
            id: "n1".to_string(),
            body: "remember <the milk>".to_string(),
            tags: vec!["errand".to_string()],
        };

        let encoded = note.to_item().unwrap();

        assert_eq!(encoded["body"].as_s().unwrap(), "remember <the milk>");
        assert_eq!(Note::from_item(&encoded).unwrap(), note);
    }
}
