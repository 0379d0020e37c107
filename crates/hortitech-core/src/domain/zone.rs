// ============================================================================
// HortiTech Core - Zone Entity
// File: crates/hortitech-core/src/domain/zone.rs
// Description: Sub-unit of a greenhouse
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{GreenhouseId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    #[serde(alias = "activo")]
    Active,
    #[serde(alias = "inactivo")]
    Inactive,
    #[serde(alias = "mantenimiento")]
    Maintenance,
}

impl ZoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneStatus::Active => "active",
            ZoneStatus::Inactive => "inactive",
            ZoneStatus::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Some(ZoneStatus::Active),
            "inactive" | "inactivo" => Some(ZoneStatus::Inactive),
            "maintenance" | "mantenimiento" => Some(ZoneStatus::Maintenance),
            _ => None,
        }
    }
}

impl Default for ZoneStatus {
    fn default() -> Self {
        ZoneStatus::Active
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub greenhouse_id: GreenhouseId,
    pub name: String,
    pub description: Option<String>,
    pub status: ZoneStatus,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewZone {
    #[validate(length(min = 1, max = 100, message = "Zone name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub status: ZoneStatus,
}

impl NewZone {
    pub fn new(
        name: String,
        description: Option<String>,
        status: Option<ZoneStatus>,
    ) -> Result<Self, validator::ValidationErrors> {
        let zone = Self {
            name: name.trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: status.unwrap_or_default(),
        };

        zone.validate()?;
        Ok(zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_zone_defaults_to_active() {
        let zone = NewZone::new("Bed A".to_string(), None, None).unwrap();
        assert_eq!(zone.status, ZoneStatus::Active);
    }

    #[test]
    fn test_create_zone_rejects_long_name() {
        assert!(NewZone::new("x".repeat(101), None, None).is_err());
    }

    #[test]
    fn test_zone_status_parsing() {
        assert_eq!(ZoneStatus::from_str("ACTIVE"), Some(ZoneStatus::Active));
        assert_eq!(ZoneStatus::from_str("inactivo"), Some(ZoneStatus::Inactive));
        assert_eq!(ZoneStatus::from_str("broken"), None);
    }
}
