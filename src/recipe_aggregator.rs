use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::PlannerError;
use crate::recipe::{round_amount, ScaledRecipe};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShoppingItem {
    pub amount: f64,
    pub unit: String,
}

/// Ingredient name to total quantity, ordered by name.
pub type ShoppingList = BTreeMap<String, ShoppingItem>;

// Ingredients are grouped by exact name. Units are not reconciled: the first unit
// seen for a name is the one reported, whatever the later occurrences use.
pub fn aggregate_shopping_list(menu: &[ScaledRecipe]) -> ShoppingList {
    let mut shopping_list = ShoppingList::new();

    for scaled in menu {
        for ingredient in &scaled.recipe.ingredients {
            shopping_list
                .entry(ingredient.name.clone())
                .or_insert_with(|| ShoppingItem {
                    amount: 0.0,
                    unit: ingredient.unit.clone(),
                })
                .amount += ingredient.amount;
        }
    }

    for item in shopping_list.values_mut() {
        item.amount = round_amount(item.amount);
    }

    shopping_list
}

/// Writes the list as `name,amount,unit` rows with a header line.
pub fn write_shopping_list_csv<W: Write>(
    shopping_list: &ShoppingList,
    writer: W,
) -> Result<(), PlannerError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["name", "amount", "unit"])?;
    for (name, item) in shopping_list {
        wtr.write_record([name.as_str(), item.amount.to_string().as_str(), item.unit.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
