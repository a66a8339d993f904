use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, instrument, warn};

use super::dto::{HomeView, RecipeView, SearchParams};
use crate::{
    auth::SessionUser, dto::PageView, error::AppError, favorites::repo as favorites_repo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search_page))
        .route("/api/search", get(api_search))
        .route("/recipe/:recipe_id", get(recipe_detail))
}

/// Landing page with one random recipe. Upstream trouble degrades to an
/// inline error rather than a failed request.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomeView> {
    let view = match state.recipes.random().await {
        Ok(Some(recipe)) => HomeView {
            recipe: Some(recipe),
            error: None,
        },
        Ok(None) => HomeView {
            recipe: None,
            error: Some("Couldn't fetch a random recipe".into()),
        },
        Err(e) => {
            warn!(error = %e, "random recipe fetch failed");
            HomeView {
                recipe: None,
                error: Some("Couldn't fetch a random recipe".into()),
            }
        }
    };
    Json(view)
}

pub async fn search_page() -> Json<PageView> {
    Json(PageView { page: "search" })
}

#[instrument(skip(state))]
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, AppError> {
    match state.recipes.search(params.query.trim()).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            error!(error = %e, query = %params.query, "recipe search failed");
            Err(AppError::Upstream("Failed to fetch recipes".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn recipe_detail(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeView>, AppError> {
    let recipe = match state.recipes.details(recipe_id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, %recipe_id, "failed to fetch recipe details");
            return Err(AppError::NotFound("Recipe not found".into()));
        }
    };

    let is_favorite = favorites_repo::exists(&state.db, user_id, recipe_id).await?;

    Ok(Json(RecipeView {
        recipe,
        recipe_id,
        is_favorite,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::client::fake::FakeRecipes;
    use crate::recipes::dto::Recipe;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn recipe(id: i64, title: &str) -> Recipe {
        serde_json::from_value(json!({ "id": id, "title": title })).unwrap()
    }

    #[tokio::test]
    async fn home_shows_a_recipe() {
        let state = AppState::fake_with(Arc::new(FakeRecipes::with(vec![recipe(7, "Soup")])));
        let Json(view) = home(State(state)).await;
        assert_eq!(view.recipe.map(|r| r.title), Some("Soup".to_string()));
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn home_degrades_to_inline_error() {
        let state = AppState::fake_with(Arc::new(FakeRecipes::failing()));
        let Json(view) = home(State(state)).await;
        assert!(view.recipe.is_none());
        assert_eq!(view.error.as_deref(), Some("Couldn't fetch a random recipe"));
    }

    #[tokio::test]
    async fn home_with_empty_catalogue_reports_error() {
        let state = AppState::fake();
        let Json(view) = home(State(state)).await;
        assert!(view.recipe.is_none());
        assert!(view.error.is_some());
    }

    #[tokio::test]
    async fn api_search_passes_upstream_json_through() {
        let fake = FakeRecipes {
            search_results: Some(json!({
                "results": [{ "id": 1, "title": "Tacos" }],
                "totalResults": 1
            })),
            ..FakeRecipes::default()
        };
        let state = AppState::fake_with(Arc::new(fake));
        let Json(body) = api_search(
            State(state),
            Query(SearchParams {
                query: "tacos".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body["totalResults"], json!(1));
        assert_eq!(body["results"][0]["title"], json!("Tacos"));
    }

    #[tokio::test]
    async fn api_search_failure_is_500() {
        let state = AppState::fake_with(Arc::new(FakeRecipes::failing()));
        let err = api_search(
            State(state),
            Query(SearchParams {
                query: "tacos".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch recipes");
    }

    #[tokio::test]
    async fn unknown_recipe_is_404() {
        let state = AppState::fake();
        let err = recipe_detail(State(state), SessionUser(Uuid::new_v4()), Path(404_404))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Recipe not found");
    }
}
