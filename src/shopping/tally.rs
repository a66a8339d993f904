use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::ingredient::{normalize_name, parse_ingredient, Dimension, ParsedIngredient, Unit};
use crate::recipes::dto::{ExtendedIngredient, Recipe};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Which amounts may be summed together for one ingredient name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum MergeClass {
    Unitless,
    Measured(Dimension),
    Named(String),
}

#[derive(Debug)]
struct Line {
    display: Option<Unit>,
    /// In the dimension base for measured units, otherwise in the unit itself.
    amount: f64,
}

/// Running totals of ingredients keyed by name and compatible unit.
#[derive(Debug, Default)]
pub struct ShoppingTally {
    lines: BTreeMap<(String, MergeClass), Line>,
}

impl ShoppingTally {
    pub fn add(&mut self, item: ParsedIngredient) {
        if item.name.is_empty() || !item.quantity.is_finite() || item.quantity < 0.0 {
            return;
        }
        let class = match &item.unit {
            None => MergeClass::Unitless,
            Some(u) if u.dimension == Dimension::Count => MergeClass::Named(u.name.clone()),
            Some(u) => MergeClass::Measured(u.dimension),
        };
        let amount = item
            .unit
            .as_ref()
            .map_or(item.quantity, |u| item.quantity * u.factor);

        self.lines
            .entry((item.name, class))
            .or_insert_with(|| Line {
                display: item.unit,
                amount: 0.0,
            })
            .amount += amount;
    }

    /// Totals in each line's first-seen unit, sorted by name, rounded to hundredths.
    pub fn into_items(self) -> Vec<AggregatedIngredient> {
        self.lines
            .into_iter()
            .map(|((name, _), line)| {
                let quantity = line
                    .display
                    .as_ref()
                    .map_or(line.amount, |u| line.amount / u.factor);
                AggregatedIngredient {
                    name,
                    quantity: (quantity * 100.0).round() / 100.0,
                    unit: line.display.map(|u| u.name).unwrap_or_default(),
                }
            })
            .collect()
    }
}

/// Prefer the upstream's structured amount/unit/name; fall back to parsing the
/// free-text line.
pub fn ingredient_from_upstream(ing: &ExtendedIngredient) -> Option<ParsedIngredient> {
    if let (Some(amount), Some(name)) = (ing.amount, ing.name.as_deref()) {
        let name = normalize_name(name);
        if amount > 0.0 && !name.is_empty() {
            return Some(ParsedIngredient {
                quantity: amount,
                unit: ing.unit.as_deref().and_then(Unit::from_label),
                name,
            });
        }
    }

    let text = ing.original.as_deref().or(ing.original_name.as_deref())?;
    let parsed = parse_ingredient(text);
    (!parsed.name.is_empty()).then_some(parsed)
}

/// Tally every ingredient of every recipe.
pub fn tally_recipes(recipes: &[Recipe]) -> ShoppingTally {
    let mut tally = ShoppingTally::default();
    for recipe in recipes {
        for ing in &recipe.extended_ingredients {
            match ingredient_from_upstream(ing) {
                Some(parsed) => tally.add(parsed),
                None => warn!(recipe_id = recipe.id, "ingredient without a usable name"),
            }
        }
    }
    tally
}
