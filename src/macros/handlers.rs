use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    macros::{
        dto::{CreateMacrosRequest, PageQuery, PaginatedMacros, UpdateMacrosRequest},
        model::MacroRecord,
        service,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/macros", get(list_macros).post(create_macros))
        .route("/macros/paginated", get(list_macros_paginated))
        .route(
            "/macros/:id",
            get(get_macros).patch(update_macros).delete(delete_macros),
        )
}

#[instrument(skip(state))]
pub async fn list_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MacroRecord>>, ApiError> {
    let records = service::list_records(&state.db, user_id).await?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn list_macros_paginated(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedMacros>, ApiError> {
    let page = service::list_paginated(&state.db, user_id, &query).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn get_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MacroRecord>, ApiError> {
    let record = service::get_record(&state.db, user_id, id).await?;
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
pub async fn create_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMacrosRequest>,
) -> Result<(StatusCode, Json<MacroRecord>), ApiError> {
    let record = service::create_record(&state.db, user_id, payload).await?;
    info!(user_id = %user_id, record_id = %record.id, date = %record.date, "macros created");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, payload))]
pub async fn update_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMacrosRequest>,
) -> Result<Json<MacroRecord>, ApiError> {
    let record = service::update_record(&state.db, user_id, id, payload).await?;
    info!(user_id = %user_id, record_id = %record.id, "macros updated");
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn delete_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    service::delete_record(&state.db, user_id, id).await?;
    info!(user_id = %user_id, record_id = %id, "macros deleted");
    Ok(Json(json!({ "msg": "Successfully deleted." })))
}
