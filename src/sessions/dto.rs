use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// A stored chat session. The message list is opaque JSON owned by the
/// frontend; the backend only orders and scopes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    #[serde(skip, default)]
    pub user_id: Uuid,
    pub title: String,
    pub messages: Json<Value>,
    /// Epoch milliseconds, set on first write and never touched again.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every write.
    pub updated_at: i64,
}

/// Body of `POST /api/sessions`; every field is optional and gets a
/// server-side default.
#[derive(Debug, Deserialize)]
pub struct UpsertSessionRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub messages: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case_without_user_id() {
        let session = ChatSession {
            id: "s1".into(),
            user_id: Uuid::new_v4(),
            title: "New Conversation".into(),
            messages: Json(serde_json::json!([{ "role": "user", "text": "やあ" }])),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_500,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(json["updatedAt"], 1_700_000_000_500_i64);
        assert_eq!(json["messages"][0]["text"], "やあ");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn upsert_request_accepts_empty_body() {
        let req: UpsertSessionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.id.is_none());
        assert!(req.title.is_none());
        assert!(req.messages.is_none());
    }
}
