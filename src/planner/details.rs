use crate::error::PlannerError;
use crate::providers::{meal_details_prompt, CompletionRequest, LlmProvider};
use std::sync::Arc;

/// Free-text recipe write-up for a single meal
pub struct MealDetails {
    provider: Arc<dyn LlmProvider>,
}

impl MealDetails {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn describe(&self, meal_name: &str) -> Result<String, PlannerError> {
        let meal_name = meal_name.trim();
        if meal_name.is_empty() {
            return Err(PlannerError::InvalidInput(
                "Meal name cannot be empty".to_string(),
            ));
        }
        let request = CompletionRequest::user(meal_details_prompt(meal_name));
        self.provider.complete(&request).await
    }
}
