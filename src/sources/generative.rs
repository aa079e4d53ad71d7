use super::RecipeSource;
use crate::error::PlannerError;
use crate::model::{MealCandidate, MealSlot, UserProfile, PLACEHOLDER_IMAGE};
use crate::providers::{meal_options_prompt, CompletionRequest, LlmProvider};
use crate::routing;
use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Candidates invented by a generative-text provider
pub struct GenerativeSource {
    provider: Arc<dyn LlmProvider>,
}

impl GenerativeSource {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

fn bracketed_array_regex() -> Option<&'static Regex> {
    static BRACKETED_ARRAY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BRACKETED_ARRAY_REGEX
        .get_or_init(|| Regex::new(r"(?s)\[.*\]").ok())
        .as_ref()
}

fn parse_array(content: &str) -> Result<Vec<RawCandidate>, PlannerError> {
    if let Ok(parsed) = serde_json::from_str::<Vec<RawCandidate>>(content.trim()) {
        return Ok(parsed);
    }

    // Models like to wrap the array in prose or code fences
    let bracketed = bracketed_array_regex()
        .and_then(|re| re.find(content))
        .ok_or_else(|| {
            PlannerError::ParseFailure("Could not parse AI meal options response".to_string())
        })?;
    debug!("Falling back to bracketed substring of the response");
    serde_json::from_str(bracketed.as_str())
        .map_err(|e| PlannerError::ParseFailure(format!("Could not parse AI meal options response: {}", e)))
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// Ids must be unique across every slot of a fetch, not just within one reply
fn slot_scoped_id(slot: MealSlot, raw: &str) -> String {
    let prefix = format!("{}-", slot);
    if raw.is_empty() || raw.starts_with(&prefix) {
        raw.to_string()
    } else {
        format!("{}{}", prefix, raw)
    }
}

/// Parse a provider reply into candidates for `slot`.
///
/// Ids are scoped as `<slot>-<id>`. Entries without a name are dropped.
/// Missing or repeated ids are replaced with `<slot>-<n>`, missing images with the placeholder, and categories are
/// resolved through the routing table with `slot` as the fallback.
pub fn parse_candidates(content: &str, slot: MealSlot) -> Result<Vec<MealCandidate>, PlannerError> {
    let raw = parse_array(content)?;
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(raw.len());

    for (index, entry) in raw.into_iter().enumerate() {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            warn!("Dropping unnamed {} suggestion at position {}", slot, index);
            continue;
        }

        let mut id = slot_scoped_id(slot, &id_string(&entry.id));
        let mut n = index + 1;
        while id.is_empty() || seen.contains(&id) {
            id = format!("{}-{}", slot, n);
            n += 1;
        }
        seen.insert(id.clone());

        let image = entry
            .image
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let category = entry
            .category
            .map(|label| routing::resolve_slot(&label, slot))
            .unwrap_or(slot);

        candidates.push(MealCandidate {
            id,
            name,
            image,
            category,
        });
    }

    Ok(candidates)
}

#[async_trait]
impl RecipeSource for GenerativeSource {
    fn source_name(&self) -> &str {
        self.provider.provider_name()
    }

    async fn fetch_candidates(
        &self,
        profile: &UserProfile,
        slot: MealSlot,
        limit: u32,
    ) -> Result<Vec<MealCandidate>, PlannerError> {
        let request = CompletionRequest::user(meal_options_prompt(profile, slot, limit));
        let content = self.provider.complete(&request).await?;
        parse_candidates(&content, slot)
    }
}
