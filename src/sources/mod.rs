//! Candidate meal sources and the fan-out that merges them.

mod generative;
mod routed;

pub use generative::{parse_candidates, GenerativeSource};
pub use routed::{ContentApiSource, ProxySource, RoutedSource};

use crate::error::PlannerError;
use crate::model::{MealCandidate, MealSlot, Recipe, UserProfile};
use crate::routing::{self, ContentCategory};
use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};
use std::collections::HashSet;

/// Anything that can offer meal candidates for a slot
#[async_trait]
pub trait RecipeSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn fetch_candidates(
        &self,
        profile: &UserProfile,
        slot: MealSlot,
        limit: u32,
    ) -> Result<Vec<MealCandidate>, PlannerError>;
}

/// Fetches normalized recipes for one provider category
#[async_trait]
pub trait CategoryFetcher: Send + Sync {
    fn fetcher_name(&self) -> &str;

    async fn fetch_category(
        &self,
        category: &ContentCategory,
        limit: u32,
    ) -> Result<Vec<Recipe>, PlannerError>;
}

/// Concatenate successful fetches in order. Failures are logged and left out;
/// an empty result overall is [`PlannerError::EmptyResultSet`].
pub fn merge_outcomes<T>(
    outcomes: Vec<(String, Result<Vec<T>, PlannerError>)>,
) -> Result<Vec<T>, PlannerError> {
    let mut merged = Vec::new();
    for (label, outcome) in outcomes {
        match outcome {
            Ok(items) => merged.extend(items),
            Err(e) => warn!("Excluding {} from candidate pool: {}", label, e),
        }
    }
    if merged.is_empty() {
        return Err(PlannerError::EmptyResultSet);
    }
    Ok(merged)
}

/// Fetch candidates for every slot the profile asks for, concurrently.
///
/// An empty `daily_meals` selection fetches all four slots. The pool is
/// deduplicated by id, first occurrence wins.
pub async fn collect_candidates(
    source: &dyn RecipeSource,
    profile: &UserProfile,
    limit: u32,
) -> Result<Vec<MealCandidate>, PlannerError> {
    let slots = routing::resolve_slots(&profile.daily_meals);
    info!(
        "Collecting candidates from {} for {} slot(s)",
        source.source_name(),
        slots.len()
    );

    let fetches = slots.iter().map(|slot| async move {
        (
            slot.to_string(),
            source.fetch_candidates(profile, *slot, limit).await,
        )
    });
    let pool = merge_outcomes(join_all(fetches).await)?;

    let mut seen = HashSet::new();
    let candidates: Vec<MealCandidate> = pool
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect();
    info!("Collected {} candidates", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_excludes_failures() {
        let outcomes = vec![
            ("a".to_string(), Ok(vec![1, 2])),
            ("b".to_string(), Err(PlannerError::EmptyResultSet)),
            ("c".to_string(), Ok(vec![3])),
        ];
        assert_eq!(merge_outcomes(outcomes).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_all_failed_is_empty_result_set() {
        let outcomes: Vec<(String, Result<Vec<u8>, PlannerError>)> = vec![
            (
                "a".to_string(),
                Err(PlannerError::ParseFailure("bad".to_string())),
            ),
            ("b".to_string(), Ok(vec![])),
        ];
        assert!(matches!(
            merge_outcomes(outcomes),
            Err(PlannerError::EmptyResultSet)
        ));
    }
}
