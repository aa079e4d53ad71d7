//! Mapping between meal slots and the content provider's categories.
//!
//! Both directions are plain lookup tables so they can be listed and tested
//! on their own.

use crate::error::PlannerError;
use crate::model::{DietType, MealSlot};

/// A category on the content provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCategory {
    /// Key used on the proxy surface (`/api/recipes/{key}`)
    pub key: &'static str,
    /// WordPress category id
    pub id: u32,
    /// Slot recipes from this category are offered under
    pub slot: MealSlot,
}

pub static CONTENT_CATEGORIES: [ContentCategory; 6] = [
    ContentCategory {
        key: "breakfast",
        id: 2608,
        slot: MealSlot::Breakfast,
    },
    ContentCategory {
        key: "lunch",
        id: 26191,
        slot: MealSlot::Lunch,
    },
    ContentCategory {
        key: "vegan-veg",
        id: 2602,
        slot: MealSlot::Lunch,
    },
    ContentCategory {
        key: "meats",
        id: 26234,
        slot: MealSlot::Dinner,
    },
    ContentCategory {
        key: "dinner",
        id: 2609,
        slot: MealSlot::Dinner,
    },
    ContentCategory {
        key: "desserts",
        id: 2593,
        slot: MealSlot::Snack,
    },
];

struct RouteRule {
    slot: MealSlot,
    base: &'static str,
    extra: Option<(&'static str, &'static [DietType])>,
}

static ROUTES: [RouteRule; 4] = [
    RouteRule {
        slot: MealSlot::Breakfast,
        base: "breakfast",
        extra: None,
    },
    RouteRule {
        slot: MealSlot::Lunch,
        base: "lunch",
        extra: Some(("vegan-veg", &[DietType::Vegetarian, DietType::Vegan])),
    },
    RouteRule {
        slot: MealSlot::Dinner,
        base: "dinner",
        extra: Some(("meats", &[DietType::Anything])),
    },
    // No snack category upstream
    RouteRule {
        slot: MealSlot::Snack,
        base: "desserts",
        extra: None,
    },
];

// Free-form labels a generative provider tends to use
static SLOT_ALIASES: [(&str, MealSlot); 14] = [
    ("breakfast", MealSlot::Breakfast),
    ("brunch", MealSlot::Breakfast),
    ("lunch", MealSlot::Lunch),
    ("vegan-veg", MealSlot::Lunch),
    ("vegetarian", MealSlot::Lunch),
    ("vegan", MealSlot::Lunch),
    ("dinner", MealSlot::Dinner),
    ("supper", MealSlot::Dinner),
    ("meats", MealSlot::Dinner),
    ("meat", MealSlot::Dinner),
    ("snack", MealSlot::Snack),
    ("snacks", MealSlot::Snack),
    ("dessert", MealSlot::Snack),
    ("desserts", MealSlot::Snack),
];

/// Look up a provider category by its key
pub fn category(key: &str) -> Option<&'static ContentCategory> {
    CONTENT_CATEGORIES.iter().find(|c| c.key == key)
}

/// Like [`category`], but an unknown key is [`PlannerError::InvalidCategory`]
pub fn require_category(key: &str) -> Result<&'static ContentCategory, PlannerError> {
    category(key).ok_or_else(|| PlannerError::InvalidCategory(key.to_string()))
}

/// All category keys the proxy accepts
pub fn category_keys() -> Vec<&'static str> {
    CONTENT_CATEGORIES.iter().map(|c| c.key).collect()
}

/// Provider categories to query for one slot
pub fn route(slot: MealSlot, diet: DietType) -> Vec<&'static ContentCategory> {
    ROUTES
        .iter()
        .filter(|rule| rule.slot == slot)
        .flat_map(|rule| {
            let extra = rule
                .extra
                .filter(|(_, diets)| diets.contains(&diet))
                .map(|(key, _)| key);
            std::iter::once(rule.base).chain(extra)
        })
        .filter_map(category)
        .collect()
}

/// The slots to fetch for. An empty selection means all four.
pub fn resolve_slots(slots: &[MealSlot]) -> Vec<MealSlot> {
    if slots.is_empty() {
        return MealSlot::ALL.to_vec();
    }
    let mut resolved = Vec::with_capacity(slots.len());
    for slot in slots {
        if !resolved.contains(slot) {
            resolved.push(*slot);
        }
    }
    resolved
}

/// Route a whole slot selection, never returning an empty result
pub fn route_slots(
    slots: &[MealSlot],
    diet: DietType,
) -> Vec<(MealSlot, &'static ContentCategory)> {
    resolve_slots(slots)
        .into_iter()
        .flat_map(|slot| route(slot, diet).into_iter().map(move |c| (slot, c)))
        .collect()
}

/// Inverse of the routing table
pub fn slot_for_key(key: &str) -> Option<MealSlot> {
    category(key).map(|c| c.slot)
}

/// Map a free-form category label onto a slot, using `fallback` for anything unknown
pub fn resolve_slot(label: &str, fallback: MealSlot) -> MealSlot {
    let normalized = label.trim().to_ascii_lowercase();
    SLOT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, slot)| *slot)
        .unwrap_or(fallback)
}
