use crate::model::{MealSlot, SelectedMeals, UserProfile};

/// System prompt shared by the plan and shopping list calls.
pub const NUTRITIONIST_SYSTEM_PROMPT: &str =
    "You are a professional nutritionist and meal planning expert. Always respond with valid JSON only.";

const PLAN_SCHEMA: &str = r#"{
  "days": [
    {
      "day": "Monday",
      "meals": {
        "breakfast": "meal name",
        "lunch": "meal name",
        "dinner": "meal name",
        "snack": "meal name"
      }
    }
  ],
  "nutritionInfo": {
    "totalCalories": 2000,
    "protein": 150,
    "carbs": 200,
    "fat": 80
  }
}"#;

const SHOPPING_LIST_SCHEMA: &str = r#"{
  "Proteins": [
    {"name": "Chicken breast", "amount": "2 lbs", "category": "Proteins", "checked": false}
  ],
  "Vegetables": [
    {"name": "Spinach", "amount": "1 bag", "category": "Vegetables", "checked": false}
  ],
  "Grains & Starches": [],
  "Dairy & Eggs": [],
  "Pantry Items": [],
  "Fruits": [],
  "Herbs & Spices": []
}"#;

fn daily_meals(profile: &UserProfile) -> String {
    profile
        .daily_meals
        .iter()
        .map(MealSlot::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ask for `limit` candidate meals for one slot
pub fn meal_options_prompt(profile: &UserProfile, slot: MealSlot, limit: u32) -> String {
    let profile_json = serde_json::to_string(profile).unwrap_or_default();
    format!(
        "Given the following user profile, recommend {limit} {slot} meal options as a JSON array of objects \
         (with id, name, image, and category fields). Use \"{slot}\" as the category of every option. \
         User profile: {profile_json}. Only return the array, no explanation."
    )
}

/// Ask for a 7-day plan. `week` lists the day names in plan order.
pub fn plan_prompt(profile: &UserProfile, selected: &SelectedMeals, week: &[&str]) -> String {
    let mut prompt = format!(
        "Create a personalized 7-day meal plan for a {}-year-old {} with the following specifications:\n\n\
         - Weight: {}\n\
         - Activity Level: {}\n\
         - Goal: {}\n\
         - Diet Type: {}\n\
         - Budget: {}\n\
         - Daily Meals: {}\n",
        profile.age,
        profile.gender,
        profile.weight_label(),
        profile.activity_level,
        profile.weight_goal,
        profile.diet_type,
        profile.budget,
        daily_meals(profile),
    );
    if !week.is_empty() {
        prompt.push_str(&format!("- Days, in order: {}\n", week.join(", ")));
    }
    if !selected.is_empty() {
        prompt.push_str(&format!(
            "- Preferred meals: {}\n",
            selected.names().join(", ")
        ));
    }
    prompt.push_str(&format!(
        "\nPlease provide a JSON response with the following structure:\n{PLAN_SCHEMA}\n\n\
         Return exactly 7 entries in \"days\". Make the meals varied, nutritious, and aligned with the user's goals. \
         Include only the meals that the user selected in their daily meals preference."
    ));
    prompt
}

/// Ask for a bucketed shopping list covering the selected meals
pub fn shopping_list_prompt(profile: &UserProfile, selected: &SelectedMeals) -> String {
    format!(
        "Create a comprehensive shopping list for these meals: {}\n\n\
         Consider:\n\
         - Serving size for {}-year-old {}\n\
         - Diet type: {}\n\
         - Budget: {}\n\
         - Plan for 7 days\n\n\
         Please provide a JSON response with ingredients organized by category:\n{SHOPPING_LIST_SCHEMA}\n\n\
         Include realistic amounts for a week's worth of meals. Group similar items together and avoid duplicates.",
        selected.names().join(", "),
        profile.age,
        profile.gender,
        profile.diet_type,
        profile.budget,
    )
}

/// Ask for a full recipe write-up of one meal
pub fn meal_details_prompt(meal_name: &str) -> String {
    format!(
        "Provide a detailed recipe for the meal \"{meal_name}\".\n\
         Include:\n\
         - A list of ingredients\n\
         - Preparation time\n\
         - Step-by-step cooking instructions"
    )
}
