use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Image used when a recipe carries no picture of its own
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-recipe.jpg";

/// One of the four meal slots a plan fills per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown meal slot: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Imperial,
    Metric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightGoal {
    LoseFat,
    Maintain,
    GainMuscle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Anything,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    Medium,
    High,
    Premium,
}

// Prompts embed the same spelling the JSON form uses
macro_rules! display_via_serde {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match serde_json::to_value(self) {
                        Ok(serde_json::Value::String(s)) => f.write_str(&s),
                        _ => write!(f, "{:?}", self),
                    }
                }
            }
        )*
    };
}

display_via_serde!(Gender, UnitSystem, ActivityLevel, WeightGoal, DietType, Budget);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Height {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feet: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inches: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cm: Option<f32>,
}

/// Demographic and preference snapshot taken once per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub gender: Gender,
    pub age: u32,
    pub units: UnitSystem,
    #[serde(default)]
    pub height: Height,
    pub weight: f32,
    pub activity_level: ActivityLevel,
    pub weight_goal: WeightGoal,
    #[serde(default)]
    pub weekly_variety: u8,
    #[serde(default)]
    pub max_complexity: u8,
    #[serde(default)]
    pub daily_meals: Vec<MealSlot>,
    pub diet_type: DietType,
    pub budget: Budget,
}

impl UserProfile {
    /// Weight with its unit suffix, e.g. `180lbs` or `82kg`
    pub fn weight_label(&self) -> String {
        let unit = match self.units {
            UnitSystem::Imperial => "lbs",
            UnitSystem::Metric => "kg",
        };
        format!("{}{}", self.weight, unit)
    }
}

/// A meal offered for selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCandidate {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: MealSlot,
}

/// Meals the user picked, keyed by candidate id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedMeals {
    meals: Vec<MealCandidate>,
}

impl SelectedMeals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the meal if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, meal: MealCandidate) -> bool {
        if let Some(pos) = self.meals.iter().position(|m| m.id == meal.id) {
            self.meals.remove(pos);
            false
        } else {
            self.meals.push(meal);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.meals.iter().any(|m| m.id == id)
    }

    pub fn names(&self) -> Vec<&str> {
        self.meals.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MealCandidate> {
        self.meals.iter()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

impl FromIterator<MealCandidate> for SelectedMeals {
    fn from_iter<I: IntoIterator<Item = MealCandidate>>(iter: I) -> Self {
        let mut selected = SelectedMeals::new();
        for meal in iter {
            if !selected.contains(&meal.id) {
                selected.meals.push(meal);
            }
        }
        selected
    }
}

/// A normalized recipe post as served by the proxy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Provider category key the recipe was fetched under
    pub category: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub date_published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack: Option<String>,
}

impl DayMeals {
    pub fn get(&self, slot: MealSlot) -> Option<&str> {
        match slot {
            MealSlot::Breakfast => self.breakfast.as_deref(),
            MealSlot::Lunch => self.lunch.as_deref(),
            MealSlot::Dinner => self.dinner.as_deref(),
            MealSlot::Snack => self.snack.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: String,
    #[serde(default)]
    pub meals: DayMeals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub total_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A seven-day plan, replaced wholesale on regeneration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub days: Vec<PlanDay>,
    pub nutrition_info: NutritionInfo,
}

/// Shopping list bucket labels, in display order
pub const INGREDIENT_BUCKETS: [&str; 7] = [
    "Proteins",
    "Vegetables",
    "Grains & Starches",
    "Dairy & Eggs",
    "Pantry Items",
    "Fruits",
    "Herbs & Spices",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientBucket {
    pub label: String,
    pub items: Vec<Ingredient>,
}

/// Shopping list grouped into buckets.
///
/// Serializes as a `label -> items` object in bucket order, the same shape
/// the provider is asked to return.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientList {
    buckets: Vec<IngredientBucket>,
}

impl Serialize for IngredientList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.label, &bucket.items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IngredientList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HashMap::<String, Vec<Ingredient>>::deserialize(deserializer).map(Self::from_buckets)
    }
}

impl IngredientList {
    /// Build from a label -> items map. Fixed buckets come first (possibly
    /// empty), any other label follows in sorted order.
    pub fn from_buckets(mut raw: HashMap<String, Vec<Ingredient>>) -> Self {
        let mut buckets: Vec<IngredientBucket> = INGREDIENT_BUCKETS
            .iter()
            .map(|label| IngredientBucket {
                label: label.to_string(),
                items: raw.remove(*label).unwrap_or_default(),
            })
            .collect();

        let mut extra: Vec<_> = raw.into_iter().collect();
        extra.sort_by(|a, b| a.0.cmp(&b.0));
        buckets.extend(
            extra
                .into_iter()
                .map(|(label, items)| IngredientBucket { label, items }),
        );

        for bucket in &mut buckets {
            for item in &mut bucket.items {
                if item.category.trim().is_empty() {
                    item.category = bucket.label.clone();
                }
            }
        }

        Self { buckets }
    }

    pub fn buckets(&self) -> &[IngredientBucket] {
        &self.buckets
    }

    pub fn bucket(&self, label: &str) -> Option<&IngredientBucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    /// Flip the checked flag of one item. Returns the new state, or None if out of range.
    pub fn toggle(&mut self, label: &str, index: usize) -> Option<bool> {
        let item = self
            .buckets
            .iter_mut()
            .find(|b| b.label == label)?
            .items
            .get_mut(index)?;
        item.checked = !item.checked;
        Some(item.checked)
    }

    pub fn total_items(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }

    pub fn checked_items(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| b.items.iter())
            .filter(|i| i.checked)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str) -> MealCandidate {
        MealCandidate {
            id: id.to_string(),
            name: name.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            category: MealSlot::Lunch,
        }
    }

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            amount: "1".to_string(),
            category: String::new(),
            checked: false,
        }
    }

    #[test]
    fn test_profile_deserializes_from_form_json() {
        let json = r#"{
            "gender": "female",
            "age": 34,
            "units": "metric",
            "height": {"cm": 168},
            "weight": 64,
            "activityLevel": "very-active",
            "weightGoal": "gain-muscle",
            "weeklyVariety": 3,
            "maxComplexity": 2,
            "dailyMeals": ["breakfast", "dinner"],
            "dietType": "vegan",
            "budget": "medium"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(profile.daily_meals, vec![MealSlot::Breakfast, MealSlot::Dinner]);
        assert_eq!(profile.weight_label(), "64kg");
        assert_eq!(profile.weight_goal.to_string(), "gain-muscle");
    }

    #[test]
    fn test_slot_from_str_is_case_insensitive() {
        assert_eq!("Dinner".parse::<MealSlot>().unwrap(), MealSlot::Dinner);
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_selected_meals_toggle() {
        let mut selected = SelectedMeals::new();
        assert!(selected.toggle(candidate("1", "Shakshuka")));
        assert!(selected.toggle(candidate("2", "Bobotie")));
        assert!(!selected.toggle(candidate("1", "Shakshuka")));
        assert_eq!(selected.len(), 1);
        assert!(selected.contains("2"));
        assert_eq!(selected.names(), vec!["Bobotie"]);
    }

    #[test]
    fn test_ingredient_list_keeps_fixed_buckets() {
        let mut raw = HashMap::new();
        raw.insert("Vegetables".to_string(), vec![ingredient("Spinach")]);
        raw.insert("Beverages".to_string(), vec![ingredient("Rooibos")]);

        let list = IngredientList::from_buckets(raw);
        let labels: Vec<&str> = list.buckets().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(&labels[..7], &INGREDIENT_BUCKETS[..]);
        assert_eq!(labels[7], "Beverages");
        assert!(list.bucket("Proteins").unwrap().items.is_empty());
        assert_eq!(
            list.bucket("Vegetables").unwrap().items[0].category,
            "Vegetables"
        );
    }

    #[test]
    fn test_ingredient_toggle_counts() {
        let mut raw = HashMap::new();
        raw.insert(
            "Fruits".to_string(),
            vec![ingredient("Apples"), ingredient("Lemons")],
        );
        let mut list = IngredientList::from_buckets(raw);

        assert_eq!(list.toggle("Fruits", 1), Some(true));
        assert_eq!(list.checked_items(), 1);
        assert_eq!(list.total_items(), 2);
        assert_eq!(list.toggle("Fruits", 1), Some(false));
        assert_eq!(list.toggle("Fruits", 5), None);
        assert_eq!(list.toggle("Nope", 0), None);
    }

    #[test]
    fn test_ingredient_list_serializes_as_ordered_map() {
        let mut raw = HashMap::new();
        raw.insert("Herbs & Spices".to_string(), vec![ingredient("Cumin")]);
        raw.insert("Beverages".to_string(), vec![ingredient("Rooibos")]);
        let list = IngredientList::from_buckets(raw);

        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with(r#"{"Proteins":[]"#));
        let positions: Vec<usize> = ["\"Proteins\"", "\"Herbs & Spices\"", "\"Beverages\""]
            .iter()
            .map(|label| json.find(label).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
        assert_eq!(value["Herbs & Spices"][0]["name"], "Cumin");

        let back: IngredientList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
