//! Zone HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use hortitech_core::{NewZone, Zone};

use super::parse_id;
use crate::dto::{ChangeStatusRequest, CreateZoneRequest, DeletedResponse};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/greenhouses/{id}/zones
pub async fn list_zones(
    State(state): State<AppState>,
    Path(greenhouse_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Zone>>>, ApiError> {
    let greenhouse_id = parse_id(&greenhouse_id, "greenhouse")?;
    let zones = state.zones.list_by_greenhouse(greenhouse_id).await?;
    Ok(Json(ApiResponse::success(zones)))
}

/// POST /api/v1/greenhouses/{id}/zones
pub async fn create_zone(
    State(state): State<AppState>,
    Path(greenhouse_id): Path<String>,
    Json(payload): Json<CreateZoneRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Zone>>), ApiError> {
    let greenhouse_id = parse_id(&greenhouse_id, "greenhouse")?;
    let zone = NewZone::try_from(payload)?;
    let created = state.zones.create(greenhouse_id, zone).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// GET /api/v1/zones/{id}
pub async fn get_zone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Zone>>, ApiError> {
    let id = parse_id(&id, "zone")?;
    let zone = state.zones.get(id).await?;
    Ok(Json(ApiResponse::success(zone)))
}

/// PATCH /api/v1/zones/{id}/status
pub async fn change_zone_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<Zone>>, ApiError> {
    let id = parse_id(&id, "zone")?;
    let target = payload.status.unwrap_or_default();
    let zone = state.zones.change_status(id, &target).await?;
    Ok(Json(ApiResponse::success_with_message(zone, "Zone status updated")))
}

/// DELETE /api/v1/zones/{id}
pub async fn delete_zone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = parse_id(&id, "zone")?;
    state.zones.delete(id).await?;
    Ok(Json(ApiResponse::success_with_message(DeletedResponse { id }, "Zone deleted")))
}
