use crate::error::PlannerError;
use crate::model::{GeneratedPlan, SelectedMeals, UserProfile};
use crate::providers::{plan_prompt, CompletionRequest, LlmProvider};
use chrono::Weekday;
use log::{debug, info};
use std::sync::Arc;

pub const PLAN_DAYS: usize = 7;

const PLAN_MAX_TOKENS: u32 = 2000;

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Seven day names beginning with `start`
pub fn week_starting(start: Weekday) -> Vec<&'static str> {
    std::iter::successors(Some(start), |day| Some(day.succ()))
        .take(PLAN_DAYS)
        .map(day_name)
        .collect()
}

/// Strictly parse a plan reply. Anything but a 7-day plan is rejected.
pub fn parse_plan(content: &str) -> Result<GeneratedPlan, PlannerError> {
    let plan: GeneratedPlan = serde_json::from_str(content.trim())
        .map_err(|e| PlannerError::ParseFailure(format!("Meal plan is not valid JSON: {}", e)))?;
    if plan.days.len() != PLAN_DAYS {
        return Err(PlannerError::ParseFailure(format!(
            "Expected {} days in meal plan, got {}",
            PLAN_DAYS,
            plan.days.len()
        )));
    }
    Ok(plan)
}

/// Builds 7-day plans through the generative provider
pub struct PlanAssembler {
    provider: Arc<dyn LlmProvider>,
}

impl PlanAssembler {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate a fresh plan. Selected meals are passed as soft preferences.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        selected: &SelectedMeals,
        start_day: Option<Weekday>,
    ) -> Result<GeneratedPlan, PlannerError> {
        let week = start_day.map(week_starting).unwrap_or_default();
        let request =
            CompletionRequest::nutritionist(plan_prompt(profile, selected, &week), PLAN_MAX_TOKENS);

        info!(
            "Generating meal plan with {} ({} preferred meals)",
            self.provider.provider_name(),
            selected.len()
        );
        let content = self.provider.complete(&request).await?;
        debug!("Plan reply: {}", content);
        parse_plan(&content)
    }
}
