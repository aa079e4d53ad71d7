pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod planner;
pub mod providers;
pub mod routing;
pub mod server;
pub mod sources;

pub use builder::{Planner, PlannerBuilder, SourceKind};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use model::{
    GeneratedPlan, IngredientList, MealCandidate, MealSlot, Recipe, SelectedMeals, UserProfile,
};

use log::debug;

/// Fetch the candidate pool for a profile straight from the content API,
/// using configuration from the environment.
pub async fn fetch_candidates(profile: &UserProfile) -> Result<Vec<MealCandidate>, PlannerError> {
    let planner = Planner::builder().build()?;
    let candidates = planner.candidates(profile).await?;
    debug!("{:#?}", candidates);
    Ok(candidates)
}

/// Generate a 7-day plan with configuration from the environment.
pub async fn generate_plan(
    profile: &UserProfile,
    selected: &SelectedMeals,
) -> Result<GeneratedPlan, PlannerError> {
    Planner::builder()
        .build()?
        .plan(profile, selected, None)
        .await
}

/// Generate a shopping list with configuration from the environment.
pub async fn generate_shopping_list(
    profile: &UserProfile,
    selected: &SelectedMeals,
) -> Result<IngredientList, PlannerError> {
    Planner::builder()
        .build()?
        .shopping_list(profile, selected)
        .await
}
