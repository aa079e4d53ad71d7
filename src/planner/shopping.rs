use crate::error::PlannerError;
use crate::model::{Ingredient, IngredientList, SelectedMeals, UserProfile};
use crate::providers::{shopping_list_prompt, CompletionRequest, LlmProvider};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

const SHOPPING_LIST_MAX_TOKENS: u32 = 1500;

/// Strictly parse a shopping list reply into buckets
pub fn parse_shopping_list(content: &str) -> Result<IngredientList, PlannerError> {
    let raw: HashMap<String, Vec<Ingredient>> = serde_json::from_str(content.trim())
        .map_err(|e| PlannerError::ParseFailure(format!("Shopping list is not valid JSON: {}", e)))?;
    Ok(IngredientList::from_buckets(raw))
}

/// Builds shopping lists through the generative provider
pub struct ShoppingListAssembler {
    provider: Arc<dyn LlmProvider>,
}

impl ShoppingListAssembler {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(
        &self,
        profile: &UserProfile,
        selected: &SelectedMeals,
    ) -> Result<IngredientList, PlannerError> {
        let request = CompletionRequest::nutritionist(
            shopping_list_prompt(profile, selected),
            SHOPPING_LIST_MAX_TOKENS,
        );

        info!("Generating shopping list for {} meals", selected.len());
        let content = self.provider.complete(&request).await?;
        let list = parse_shopping_list(&content)?;
        info!("Shopping list has {} items", list.total_items());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::INGREDIENT_BUCKETS;

    #[test]
    fn test_parse_shopping_list() {
        let content = r#"{
            "Proteins": [{"name": "Chicken thighs", "amount": "1 kg", "category": "Proteins", "checked": false}],
            "Herbs & Spices": [{"name": "Cumin", "amount": "1 jar"}],
            "Fruits": []
        }"#;
        let list = parse_shopping_list(content).unwrap();

        assert_eq!(list.buckets().len(), INGREDIENT_BUCKETS.len());
        assert_eq!(list.total_items(), 2);
        let spices = list.bucket("Herbs & Spices").unwrap();
        assert_eq!(spices.items[0].category, "Herbs & Spices");
        assert!(!spices.items[0].checked);
        assert!(list.bucket("Dairy & Eggs").unwrap().items.is_empty());
    }

    #[test]
    fn test_parse_shopping_list_rejects_prose() {
        let result = parse_shopping_list("Here you go: {\"Proteins\": []}");
        assert!(matches!(result, Err(PlannerError::ParseFailure(_))));
    }
}
