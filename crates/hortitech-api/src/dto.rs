//! Request payloads
//!
//! Field aliases keep older clients that send the Spanish names working.

use serde::{Deserialize, Serialize};

use hortitech_core::{GreenhouseChanges, GreenhouseId, NewGreenhouse, NewZone, ZoneStatus};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateGreenhouseRequest {
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "responsable_id")]
    pub operator_id: Option<i32>,
}

impl TryFrom<CreateGreenhouseRequest> for NewGreenhouse {
    type Error = ApiError;

    fn try_from(req: CreateGreenhouseRequest) -> Result<Self, Self::Error> {
        let operator_id = req
            .operator_id
            .ok_or_else(|| ApiError::BadRequest("Missing field operator_id".to_string()))?;

        NewGreenhouse::new(req.name, req.description, operator_id)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGreenhouseRequest {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "responsable_id")]
    pub operator_id: Option<i32>,
}

impl TryFrom<UpdateGreenhouseRequest> for GreenhouseChanges {
    type Error = ApiError;

    fn try_from(req: UpdateGreenhouseRequest) -> Result<Self, Self::Error> {
        GreenhouseChanges::new(req.name, req.description, req.operator_id)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeStatusRequest {
    #[serde(default, alias = "estado")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateZoneRequest {
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    #[serde(default, alias = "estado")]
    pub status: Option<String>,
}

impl TryFrom<CreateZoneRequest> for NewZone {
    type Error = ApiError;

    fn try_from(req: CreateZoneRequest) -> Result<Self, Self::Error> {
        let status = match req.status.as_deref() {
            Some(raw) => Some(
                ZoneStatus::from_str(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {raw}")))?,
            ),
            None => None,
        };

        NewZone::new(req.name, req.description, status).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: GreenhouseId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_legacy_field_names() {
        let req: CreateGreenhouseRequest = serde_json::from_str(
            r#"{"nombre": "Norte", "descripcion": "Tomates", "responsable_id": 4, "zonas_totales": 3}"#,
        )
        .unwrap();
        let greenhouse = NewGreenhouse::try_from(req).unwrap();

        assert_eq!(greenhouse.name, "Norte");
        assert_eq!(greenhouse.operator_id, 4);
    }

    #[test]
    fn test_create_request_requires_operator() {
        let req: CreateGreenhouseRequest = serde_json::from_str(r#"{"name": "North"}"#).unwrap();
        assert!(matches!(NewGreenhouse::try_from(req), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_zone_request_rejects_unknown_status() {
        let req: CreateZoneRequest =
            serde_json::from_str(r#"{"name": "Bed A", "status": "flooded"}"#).unwrap();
        assert!(NewZone::try_from(req).is_err());
    }
}
