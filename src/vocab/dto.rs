use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// A saved vocabulary entry. Doubles as the wire shape (camelCase,
/// `user_id` never leaves the server) and the row shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    /// Caller-supplied, globally unique. A repeated id overwrites all
    /// mutable fields (upsert).
    pub id: String,
    #[serde(skip, default)]
    pub user_id: Uuid,
    pub term: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "empty_examples")]
    pub examples: Json<Vec<String>>,
    #[serde(default = "default_mastery")]
    pub mastery: i32,
    /// Caller-supplied epoch milliseconds.
    pub added_at: i64,
}

fn default_mastery() -> i32 {
    1
}

fn empty_examples() -> Json<Vec<String>> {
    Json(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case_without_user_id() {
        let item = VocabItem {
            id: "v1".into(),
            user_id: Uuid::new_v4(),
            term: "猫".into(),
            reading: "ねこ".into(),
            meaning: "cat".into(),
            explanation: String::new(),
            examples: Json(vec!["猫がいます".into()]),
            mastery: 2,
            added_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["addedAt"], 1_700_000_000_000_i64);
        assert_eq!(json["examples"][0], "猫がいます");
        assert!(json.get("userId").is_none());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let item: VocabItem = serde_json::from_value(serde_json::json!({
            "id": "v2",
            "term": "犬",
            "addedAt": 1_700_000_000_001_i64
        }))
        .unwrap();
        assert_eq!(item.mastery, 1);
        assert!(item.examples.0.is_empty());
        assert!(item.reading.is_empty());
    }
}
