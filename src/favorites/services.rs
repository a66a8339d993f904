use tracing::warn;

use crate::recipes::{client::RecipeClient, dto::Recipe};

/// Fetch details for each favorite in order, one upstream call per id.
/// Ids the upstream cannot resolve are logged and left out.
pub async fn hydrate_favorites(client: &dyn RecipeClient, recipe_ids: &[i64]) -> Vec<Recipe> {
    let mut recipes = Vec::with_capacity(recipe_ids.len());
    for &recipe_id in recipe_ids {
        match client.details(recipe_id).await {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => warn!(error = %e, %recipe_id, "skipping favorite that failed to load"),
        }
    }
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::client::fake::FakeRecipes;
    use serde_json::json;

    fn recipe(id: i64) -> Recipe {
        serde_json::from_value(json!({ "id": id, "title": format!("recipe {id}") })).unwrap()
    }

    #[tokio::test]
    async fn keeps_order_and_skips_missing() {
        let client = FakeRecipes::with(vec![recipe(3), recipe(1), recipe(2)]);
        let out = hydrate_favorites(&client, &[2, 99, 3, 1]).await;
        let ids: Vec<i64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn failing_upstream_yields_empty_list() {
        let client = FakeRecipes::failing();
        assert!(hydrate_favorites(&client, &[1, 2]).await.is_empty());
    }
}
