use serde_json::Value;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ChatSession;

pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ChatSession>> {
    let rows = sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT id, user_id, title, messages, created_at, updated_at
        FROM sessions
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Insert sets both timestamps to now; the conflict arm refreshes
/// `updated_at` only, preserving `created_at` from the first write.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    id: &str,
    title: &str,
    messages: &Value,
) -> anyhow::Result<()> {
    let now = now_ms();
    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, title, messages, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            messages = EXCLUDED.messages,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(messages)
    .bind(now)
    .execute(db)
    .await?;
    Ok(())
}

/// Owner-filtered delete; a foreign or unknown id is a silent no-op.
pub async fn delete(db: &PgPool, user_id: Uuid, id: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_epoch_milliseconds() {
        let ms = now_ms();
        // After 2023-01-01 and before 2100, in milliseconds.
        assert!(ms > 1_672_531_200_000);
        assert!(ms < 4_102_444_800_000);
    }
}
