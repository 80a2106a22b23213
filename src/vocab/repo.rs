use sqlx::PgPool;
use uuid::Uuid;

use super::dto::VocabItem;

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<VocabItem>> {
    let rows = sqlx::query_as::<_, VocabItem>(
        r#"
        SELECT id, user_id, term, reading, meaning, explanation, examples, mastery, added_at
        FROM vocab
        WHERE user_id = $1
        ORDER BY added_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Insert-or-overwrite by id. The conflict arm rewrites every mutable
/// field, so a repeated save reflects the latest values exactly once.
pub async fn upsert(db: &PgPool, user_id: Uuid, item: &VocabItem) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO vocab (id, user_id, term, reading, meaning, explanation, examples, mastery, added_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            term = EXCLUDED.term,
            reading = EXCLUDED.reading,
            meaning = EXCLUDED.meaning,
            explanation = EXCLUDED.explanation,
            examples = EXCLUDED.examples,
            mastery = EXCLUDED.mastery,
            added_at = EXCLUDED.added_at
        "#,
    )
    .bind(&item.id)
    .bind(user_id)
    .bind(&item.term)
    .bind(&item.reading)
    .bind(&item.meaning)
    .bind(&item.explanation)
    .bind(&item.examples)
    .bind(item.mastery)
    .bind(item.added_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Owner-filtered delete; a foreign or unknown id is a silent no-op.
pub async fn delete(db: &PgPool, user_id: Uuid, id: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM vocab WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
