use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(day_format, Date, "[year]-[month]-[day]");

/// The fixed set of meal slots a day can hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snacks" => Some(Self::Snacks),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One meal's nutrient values. Every field is strictly positive on any
/// persisted entry; the write paths enforce this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    pub name: MealType,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub fibres: f64,
    pub calories: f64,
}

/// One user's macros for one calendar day. Meals are embedded as a JSONB
/// column so a create is a single-row write; (user_id, date) carries a
/// unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MacroRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "day_format")]
    pub date: Date,
    pub meals: Json<Vec<MealEntry>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_serde_is_lowercase() {
        let json = serde_json::to_string(&MealType::Breakfast).unwrap();
        assert_eq!(json, r#""breakfast""#);
        let back: MealType = serde_json::from_str(r#""snacks""#).unwrap();
        assert_eq!(back, MealType::Snacks);
    }

    #[test]
    fn meal_type_parse_rejects_unknown_names() {
        assert_eq!(MealType::parse("lunch"), Some(MealType::Lunch));
        assert_eq!(MealType::parse("brunch"), None);
        assert_eq!(MealType::parse("Lunch"), None);
        assert_eq!(MealType::parse(""), None);
    }

    #[test]
    fn meal_entry_roundtrips_through_json() {
        let entry = MealEntry {
            name: MealType::Dinner,
            protein: 32.5,
            carbs: 80.0,
            fats: 12.0,
            fibres: 6.0,
            calories: 560.0,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: MealEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
