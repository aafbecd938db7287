use std::collections::HashSet;

use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::macros::dto::{
    CreateMacrosRequest, MealInput, PageQuery, PaginatedMacros, UpdateMacrosRequest,
};
use crate::macros::model::{MacroRecord, MealEntry, MealType};
use crate::macros::repo::{self, SortColumn, SortDirection};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Validates and persists a new day record. All checks run before the
/// single insert; a duplicate (owner, date) is reported by the store's
/// unique index, never pre-checked.
pub async fn create_record(
    db: &PgPool,
    owner: Uuid,
    req: CreateMacrosRequest,
) -> Result<MacroRecord, ApiError> {
    let raw_date = req
        .date
        .ok_or_else(|| ApiError::Validation("date is required".into()))?;
    let date = parse_day(&raw_date)?;

    let meals = parse_meal_list(req.meals, "meals must be a non-empty list")?;
    if meals.is_empty() {
        return Err(ApiError::Validation("meals must be a non-empty list".into()));
    }
    let meals = validate_new_meals(&meals)?;

    repo::insert(db, owner, date, &meals).await
}

pub async fn list_records(db: &PgPool, owner: Uuid) -> Result<Vec<MacroRecord>, ApiError> {
    repo::list_all(db, owner).await
}

pub async fn get_record(db: &PgPool, owner: Uuid, id: Uuid) -> Result<MacroRecord, ApiError> {
    repo::find_by_id(db, owner, id).await?.ok_or_else(not_found)
}

pub async fn list_paginated(
    db: &PgPool,
    owner: Uuid,
    query: &PageQuery,
) -> Result<PaginatedMacros, ApiError> {
    let page = parse_count(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_count(query.limit.as_deref(), DEFAULT_LIMIT);
    let (column, direction) = parse_sort(query.sort.as_deref());
    let skip = (page - 1) * limit;

    let records = repo::list_page(db, owner, column, direction, limit, skip).await?;
    let total_count = repo::count(db, owner).await?;
    let page_count = page_count(total_count, limit);

    Ok(PaginatedMacros {
        records,
        total_count,
        page_count,
    })
}

/// Field-level merge into the meals already on the record. Entries whose
/// name matches no existing meal are ignored; update never introduces a
/// new meal type. A negative value anywhere aborts before the write.
pub async fn update_record(
    db: &PgPool,
    owner: Uuid,
    id: Uuid,
    req: UpdateMacrosRequest,
) -> Result<MacroRecord, ApiError> {
    let record = repo::find_by_id(db, owner, id).await?.ok_or_else(not_found)?;

    let patches = parse_meal_list(req.meals, "meals must be a list")?;

    let mut meals = record.meals.0;
    merge_meal_updates(&mut meals, &patches)?;

    repo::update_meals(db, owner, id, &meals)
        .await?
        .ok_or_else(not_found)
}

pub async fn delete_record(db: &PgPool, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
    let deleted = repo::delete(db, owner, id).await?;
    if deleted == 0 {
        return Err(not_found());
    }
    Ok(())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Macros with provided id not found".into())
}

// Missing and non-array both get the caller's message; elements that are
// not objects of meal fields fall through to the per-meal error.
fn parse_meal_list(
    value: Option<serde_json::Value>,
    list_msg: &str,
) -> Result<Vec<MealInput>, ApiError> {
    let value = value.ok_or_else(|| ApiError::Validation(list_msg.into()))?;
    if !value.is_array() {
        return Err(ApiError::Validation(list_msg.into()));
    }
    serde_json::from_value(value).map_err(|_| invalid_meal())
}

fn parse_day(raw: &str) -> Result<Date, ApiError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(raw, format).map_err(|_| ApiError::Validation("invalid date".into()))
}

fn validate_new_meals(meals: &[MealInput]) -> Result<Vec<MealEntry>, ApiError> {
    let mut seen: HashSet<MealType> = HashSet::new();
    let mut entries = Vec::with_capacity(meals.len());
    for meal in meals {
        let name = meal
            .name
            .as_deref()
            .and_then(MealType::parse)
            .ok_or_else(invalid_meal)?;
        let entry = MealEntry {
            name,
            protein: require_positive(meal.protein)?,
            carbs: require_positive(meal.carbs)?,
            fats: require_positive(meal.fats)?,
            fibres: require_positive(meal.fibres)?,
            calories: require_positive(meal.calories)?,
        };
        if !seen.insert(name) {
            return Err(ApiError::Validation(format!("duplicate meal type {name}")));
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn merge_meal_updates(meals: &mut [MealEntry], patches: &[MealInput]) -> Result<(), ApiError> {
    for patch in patches {
        let Some(name) = patch.name.as_deref().and_then(MealType::parse) else {
            continue;
        };
        let Some(entry) = meals.iter_mut().find(|m| m.name == name) else {
            continue;
        };
        merge_field(&mut entry.protein, patch.protein)?;
        merge_field(&mut entry.carbs, patch.carbs)?;
        merge_field(&mut entry.fats, patch.fats)?;
        merge_field(&mut entry.fibres, patch.fibres)?;
        merge_field(&mut entry.calories, patch.calories)?;
    }
    Ok(())
}

fn merge_field(current: &mut f64, submitted: Option<f64>) -> Result<(), ApiError> {
    match submitted {
        // Absent or zero keeps the stored value.
        None => Ok(()),
        Some(v) if v == 0.0 => Ok(()),
        Some(v) if v < 0.0 => Err(invalid_meal()),
        Some(v) => {
            *current = v;
            Ok(())
        }
    }
}

fn require_positive(value: Option<f64>) -> Result<f64, ApiError> {
    match value {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(invalid_meal()),
    }
}

fn invalid_meal() -> ApiError {
    ApiError::Validation("invalid meal data".into())
}

fn parse_count(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

fn parse_sort(raw: Option<&str>) -> (SortColumn, SortDirection) {
    let Some(raw) = raw else {
        return (SortColumn::CreatedAt, SortDirection::Desc);
    };
    let (column, direction) = raw.split_once('|').unwrap_or((raw, ""));
    let column = SortColumn::parse(column).unwrap_or(SortColumn::CreatedAt);
    let direction = if direction == "DESC" {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    (column, direction)
}

fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}
