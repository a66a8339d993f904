use serde::{Deserialize, Serialize};

use super::{repo::ShoppingListItem, tally::AggregatedIngredient};

#[derive(Debug, Deserialize)]
pub struct AddToShoppingListRequest {
    pub ingredients: Vec<ShoppingItemRequest>,
}

/// One ingredient as the recipe page sends it: the upstream `original` line
/// plus its structured amount and unit when known.
#[derive(Debug, Deserialize)]
pub struct ShoppingItemRequest {
    pub original: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListView {
    /// Computed from the user's favorite recipes.
    pub ingredients: Vec<AggregatedIngredient>,
    /// Stored through `add_to_shopping_list`.
    pub saved: Vec<ShoppingListItem>,
}
