use sqlx::{types::Json, PgPool};
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::macros::model::{MacroRecord, MealEntry};

const RECORD_COLUMNS: &str = "id, user_id, date, meals, created_at, updated_at";

/// Column whitelist for the paginated listing; anything else would be a
/// SQL injection hole since ORDER BY cannot be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    CreatedAt,
    UpdatedAt,
}

impl SortColumn {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "date" => Some(Self::Date),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    meals: &[MealEntry],
) -> Result<MacroRecord, ApiError> {
    let record = sqlx::query_as::<_, MacroRecord>(&format!(
        "INSERT INTO macro_records (user_id, date, meals) \
         VALUES ($1, $2, $3) \
         RETURNING {RECORD_COLUMNS}"
    ))
    .bind(user_id)
    .bind(date)
    .bind(Json(meals))
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("record already exists for this date".into())
        } else {
            ApiError::from(e)
        }
    })?;
    Ok(record)
}

pub async fn find_by_id(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<MacroRecord>, ApiError> {
    let record = sqlx::query_as::<_, MacroRecord>(&format!(
        "SELECT {RECORD_COLUMNS} FROM macro_records WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(record)
}

pub async fn list_all(db: &PgPool, user_id: Uuid) -> Result<Vec<MacroRecord>, ApiError> {
    let records = sqlx::query_as::<_, MacroRecord>(&format!(
        "SELECT {RECORD_COLUMNS} FROM macro_records WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(records)
}

pub async fn list_page(
    db: &PgPool,
    user_id: Uuid,
    column: SortColumn,
    direction: SortDirection,
    limit: i64,
    offset: i64,
) -> Result<Vec<MacroRecord>, ApiError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM macro_records WHERE user_id = $1 \
         ORDER BY {} {} LIMIT $2 OFFSET $3",
        column.as_sql(),
        direction.as_sql(),
    );
    let records = sqlx::query_as::<_, MacroRecord>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
    Ok(records)
}

pub async fn count(db: &PgPool, user_id: Uuid) -> Result<i64, ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM macro_records WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(total)
}

pub async fn update_meals(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    meals: &[MealEntry],
) -> Result<Option<MacroRecord>, ApiError> {
    let record = sqlx::query_as::<_, MacroRecord>(&format!(
        "UPDATE macro_records SET meals = $3, updated_at = now() \
         WHERE id = $1 AND user_id = $2 \
         RETURNING {RECORD_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .bind(Json(meals))
    .fetch_optional(db)
    .await?;
    Ok(record)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, ApiError> {
    let result = sqlx::query("DELETE FROM macro_records WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

// Postgres unique_violation; the only unique index on macro_records is
// (user_id, date).
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_parse_accepts_both_casings() {
        assert_eq!(SortColumn::parse("date"), Some(SortColumn::Date));
        assert_eq!(SortColumn::parse("createdAt"), Some(SortColumn::CreatedAt));
        assert_eq!(SortColumn::parse("created_at"), Some(SortColumn::CreatedAt));
        assert_eq!(SortColumn::parse("updatedAt"), Some(SortColumn::UpdatedAt));
        assert_eq!(SortColumn::parse("meals"), None);
        assert_eq!(SortColumn::parse("date; DROP TABLE users"), None);
    }
}
