use serde::{Deserialize, Serialize};

use crate::macros::model::MacroRecord;

/// One submitted meal. All fields are optional so the service layer can
/// report precise validation errors instead of a bare deserialize failure;
/// on update, an absent field means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealInput {
    pub name: Option<String>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub fibres: Option<f64>,
    pub calories: Option<f64>,
}

/// `meals` stays raw JSON here so a present-but-non-list value gets the
/// service's "must be a list" message instead of a deserialize rejection.
#[derive(Debug, Deserialize)]
pub struct CreateMacrosRequest {
    pub date: Option<String>,
    pub meals: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMacrosRequest {
    pub meals: Option<serde_json::Value>,
}

/// Query string for the paginated listing. Raw strings so that a
/// non-numeric `page` or `limit` falls back to the default instead of
/// failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedMacros {
    pub records: Vec<MacroRecord>,
    pub total_count: i64,
    pub page_count: i64,
}
