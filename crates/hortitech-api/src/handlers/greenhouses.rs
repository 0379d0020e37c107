// ============================================================================
// HortiTech API - Greenhouse Handlers
// File: crates/hortitech-api/src/handlers/greenhouses.rs
// ============================================================================
//! Greenhouse HTTP handlers. Business rules live in the core services; these
//! only parse input and shape responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use hortitech_core::{Greenhouse, GreenhouseChanges, GreenhouseSummary, NewGreenhouse};

use super::parse_id;
use crate::dto::{ChangeStatusRequest, CreateGreenhouseRequest, DeletedResponse, UpdateGreenhouseRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/v1/greenhouses
pub async fn list_greenhouses(State(state): State<AppState>) -> ApiResult<Vec<Greenhouse>> {
    let greenhouses = state.greenhouses.list_all().await?;
    Ok(Json(ApiResponse::success(greenhouses)))
}

/// GET /api/v1/greenhouses/active
pub async fn list_active_greenhouses(State(state): State<AppState>) -> ApiResult<Vec<Greenhouse>> {
    let greenhouses = state.greenhouses.list_active().await?;
    Ok(Json(ApiResponse::success(greenhouses)))
}

/// GET /api/v1/greenhouses/active/summary
pub async fn list_active_summaries(State(state): State<AppState>) -> ApiResult<Vec<GreenhouseSummary>> {
    let summaries = state.greenhouses.list_active_summaries().await?;
    Ok(Json(ApiResponse::success(summaries)))
}

/// GET /api/v1/greenhouses/operator/{operator_id}
pub async fn list_by_operator(
    State(state): State<AppState>,
    Path(operator_id): Path<String>,
) -> ApiResult<Vec<Greenhouse>> {
    let operator_id = parse_id(&operator_id, "operator")?;
    let greenhouses = state.greenhouses.list_by_operator(operator_id).await?;
    Ok(Json(ApiResponse::success(greenhouses)))
}

/// GET /api/v1/greenhouses/{id}
pub async fn get_greenhouse(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let greenhouse = state.greenhouses.get(id).await?;
    Ok(Json(ApiResponse::success(greenhouse)))
}

/// POST /api/v1/greenhouses
pub async fn create_greenhouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateGreenhouseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Greenhouse>>), ApiError> {
    let greenhouse = NewGreenhouse::try_from(payload)?;
    let created = state.greenhouses.create(greenhouse).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// PUT /api/v1/greenhouses/{id}
pub async fn update_greenhouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGreenhouseRequest>,
) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let changes = GreenhouseChanges::try_from(payload)?;
    let updated = state.greenhouses.update(id, changes).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Greenhouse updated")))
}

/// PATCH /api/v1/greenhouses/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let target = payload.status.unwrap_or_default();
    let updated = state.greenhouses.change_status(id, &target).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Greenhouse status updated")))
}

/// PATCH /api/v1/greenhouses/{id}/activate
pub async fn activate(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let updated = state.greenhouses.activate(id).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Greenhouse activated")))
}

/// PATCH /api/v1/greenhouses/{id}/deactivate
pub async fn deactivate(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let updated = state.greenhouses.deactivate(id).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Greenhouse deactivated")))
}

/// PATCH /api/v1/greenhouses/{id}/maintenance
pub async fn start_maintenance(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Greenhouse> {
    let id = parse_id(&id, "greenhouse")?;
    let updated = state.greenhouses.start_maintenance(id).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Greenhouse under maintenance")))
}

/// DELETE /api/v1/greenhouses/{id}
pub async fn delete_greenhouse(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<DeletedResponse> {
    let id = parse_id(&id, "greenhouse")?;
    state.greenhouses.delete(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        DeletedResponse { id },
        "Greenhouse permanently deleted",
    )))
}
