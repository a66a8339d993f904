use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AddFavoriteRequest, FavouritesView},
    repo,
    services::hydrate_favorites,
};
use crate::{auth::SessionUser, dto::StatusResponse, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add_favorite", post(add_favorite))
        .route("/remove_favorite/:recipe_id", post(remove_favorite))
        .route("/favourites", get(favourites))
}

#[instrument(skip(state, body))]
pub async fn add_favorite(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(body): Json<AddFavoriteRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let recipe_id = match body.recipe_id {
        Some(id) if id > 0 => id,
        _ => return Err(AppError::BadRequest("recipe_id is required".into())),
    };

    if repo::add(&state.db, user_id, recipe_id).await? {
        info!(%user_id, %recipe_id, "favorite added");
        Ok(Json(StatusResponse::SUCCESS))
    } else {
        Ok(Json(StatusResponse::ALREADY_FAVORITED))
    }
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<StatusResponse>, AppError> {
    if repo::remove(&state.db, user_id, recipe_id).await? {
        info!(%user_id, %recipe_id, "favorite removed");
    }
    Ok(Json(StatusResponse::SUCCESS))
}

#[instrument(skip(state))]
pub async fn favourites(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<FavouritesView>, AppError> {
    let recipe_ids = repo::list_recipe_ids(&state.db, user_id).await?;
    let recipes = hydrate_favorites(state.recipes.as_ref(), &recipe_ids).await;
    Ok(Json(FavouritesView { recipes }))
}
