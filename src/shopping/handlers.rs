use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AddToShoppingListRequest, ShoppingListView},
    ingredient::Unit,
    repo::{self, NewShoppingItem},
    tally::tally_recipes,
};
use crate::{
    auth::SessionUser,
    dto::StatusResponse,
    error::AppError,
    favorites::{repo as favorites_repo, services::hydrate_favorites},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add_to_shopping_list", post(add_to_shopping_list))
        .route("/shopping_list", get(shopping_list))
}

/// Validate the request and key each item by its `original` text and canonical unit.
fn prepare_items(body: AddToShoppingListRequest) -> Result<Vec<NewShoppingItem>, AppError> {
    body.ingredients
        .into_iter()
        .map(|item| {
            let ingredient = item.original.trim().to_string();
            if ingredient.is_empty() {
                return Err(AppError::BadRequest("ingredient text is required".into()));
            }
            let quantity = item.amount.unwrap_or(1.0);
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(AppError::BadRequest(format!("invalid amount for {ingredient}")));
            }
            let unit = item
                .unit
                .as_deref()
                .and_then(Unit::from_label)
                .map(|u| u.name)
                .unwrap_or_default();
            Ok(NewShoppingItem {
                ingredient,
                quantity,
                unit,
            })
        })
        .collect()
}

#[instrument(skip(state, body))]
pub async fn add_to_shopping_list(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(body): Json<AddToShoppingListRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let items = prepare_items(body)?;
    if !items.is_empty() {
        repo::add_items(&state.db, user_id, &items).await?;
    }
    info!(%user_id, count = items.len(), "shopping list updated");
    Ok(Json(StatusResponse::SUCCESS))
}

#[instrument(skip(state))]
pub async fn shopping_list(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<ShoppingListView>, AppError> {
    let recipe_ids = favorites_repo::list_recipe_ids(&state.db, user_id).await?;
    let recipes = hydrate_favorites(state.recipes.as_ref(), &recipe_ids).await;
    let ingredients = tally_recipes(&recipes).into_items();
    let saved = repo::list_items(&state.db, user_id).await?;

    Ok(Json(ShoppingListView { ingredients, saved }))
}
