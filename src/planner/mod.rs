//! Plan, shopping list and recipe write-ups generated by the provider.
//!
//! Every call is a fresh request: no caching and no retry. Replies are parsed
//! strictly and any failure is handed back to the caller as-is.

mod details;
mod plan;
mod shopping;

pub use details::MealDetails;
pub use plan::{parse_plan, week_starting, PlanAssembler, PLAN_DAYS};
pub use shopping::{parse_shopping_list, ShoppingListAssembler};
