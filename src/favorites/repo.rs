use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn exists(db: &PgPool, user_id: Uuid, recipe_id: i64) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM favorites
             WHERE user_id = $1 AND recipe_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_one(db)
    .await
    .context("check favorite")?;
    Ok(found)
}

/// Insert a favorite. Returns `false` when the pair was already stored.
pub async fn add(db: &PgPool, user_id: Uuid, recipe_id: i64) -> anyhow::Result<bool> {
    let inserted: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO favorites (user_id, recipe_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, recipe_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_optional(db)
    .await
    .context("insert favorite")?;
    Ok(inserted.is_some())
}

/// Delete a favorite if present. Returns whether a row was removed.
pub async fn remove(db: &PgPool, user_id: Uuid, recipe_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        DELETE FROM favorites
         WHERE user_id = $1 AND recipe_id = $2
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(db)
    .await
    .context("delete favorite")?;
    Ok(res.rows_affected() > 0)
}

/// Recipe ids the user has favorited, oldest first.
pub async fn list_recipe_ids(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT recipe_id
          FROM favorites
         WHERE user_id = $1
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list favorites by user")?;
    Ok(ids)
}
