use serde::{Deserialize, Serialize};

use crate::recipes::dto::Recipe;

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(default)]
    pub recipe_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FavouritesView {
    pub recipes: Vec<Recipe>,
}
