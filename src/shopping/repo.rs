use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShoppingItem {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
}

/// Add to the user's list inside a transaction; a matching
/// (ingredient, unit) row has its quantity incremented instead.
pub async fn upsert_item_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    item: &NewShoppingItem,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shopping_list_items (user_id, ingredient, quantity, unit)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, ingredient, unit)
        DO UPDATE SET quantity = shopping_list_items.quantity + EXCLUDED.quantity
        "#,
    )
    .bind(user_id)
    .bind(&item.ingredient)
    .bind(item.quantity)
    .bind(&item.unit)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("upsert shopping item {}", item.ingredient))?;

    Ok(())
}

pub async fn add_items(
    db: &PgPool,
    user_id: Uuid,
    items: &[NewShoppingItem],
) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    for item in items {
        upsert_item_tx(&mut tx, user_id, item).await?;
    }
    tx.commit().await.context("commit tx")?;
    Ok(())
}

pub async fn list_items(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ShoppingListItem>> {
    let rows = sqlx::query_as::<_, ShoppingListItem>(
        r#"
        SELECT id, ingredient, quantity, unit
          FROM shopping_list_items
         WHERE user_id = $1
         ORDER BY ingredient ASC, unit ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list shopping items by user")?;

    Ok(rows)
}
