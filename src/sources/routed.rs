use super::{merge_outcomes, CategoryFetcher, RecipeSource};
use crate::error::PlannerError;
use crate::fetchers::{ProxyClient, WordPressClient};
use crate::model::{MealCandidate, MealSlot, Recipe, UserProfile};
use crate::routing;
use async_trait::async_trait;
use futures::future::join_all;

/// Candidates straight from the WordPress content API
pub type ContentApiSource = RoutedSource<WordPressClient>;

/// Candidates through a running recipe proxy
pub type ProxySource = RoutedSource<ProxyClient>;

/// Routes a slot onto provider categories and fetches them all at once
pub struct RoutedSource<F> {
    fetcher: F,
}

impl<F: CategoryFetcher> RoutedSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

fn into_candidate(recipe: Recipe, fallback: MealSlot) -> MealCandidate {
    MealCandidate {
        category: routing::slot_for_key(&recipe.category).unwrap_or(fallback),
        id: recipe.id,
        name: recipe.name,
        image: recipe.image,
    }
}

#[async_trait]
impl<F: CategoryFetcher> RecipeSource for RoutedSource<F> {
    fn source_name(&self) -> &str {
        self.fetcher.fetcher_name()
    }

    async fn fetch_candidates(
        &self,
        profile: &UserProfile,
        slot: MealSlot,
        limit: u32,
    ) -> Result<Vec<MealCandidate>, PlannerError> {
        let categories = routing::route(slot, profile.diet_type);
        let fetches = categories.into_iter().map(|category| async move {
            (
                category.key.to_string(),
                self.fetcher.fetch_category(category, limit).await,
            )
        });
        let recipes = merge_outcomes(join_all(fetches).await)?;

        Ok(recipes
            .into_iter()
            .map(|recipe| into_candidate(recipe, slot))
            .collect())
    }
}
