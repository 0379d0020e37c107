// ============================================================================
// HortiTech Core - Greenhouse Entity
// File: crates/hortitech-core/src/domain/greenhouse.rs
// Description: Greenhouse read model, lifecycle status, and write payloads
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{GreenhouseId, OperatorId, OperatorSummary};

/// Greenhouse lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreenhouseStatus {
    #[serde(alias = "activo")]
    Active,
    #[serde(alias = "inactivo")]
    Inactive,
    #[serde(alias = "mantenimiento")]
    Maintenance,
}

impl GreenhouseStatus {
    pub const ALL: [GreenhouseStatus; 3] = [
        GreenhouseStatus::Active,
        GreenhouseStatus::Inactive,
        GreenhouseStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GreenhouseStatus::Active => "active",
            GreenhouseStatus::Inactive => "inactive",
            GreenhouseStatus::Maintenance => "maintenance",
        }
    }

    /// Accepts the canonical names and the Spanish names used by older clients.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Some(GreenhouseStatus::Active),
            "inactive" | "inactivo" => Some(GreenhouseStatus::Inactive),
            "maintenance" | "mantenimiento" => Some(GreenhouseStatus::Maintenance),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, GreenhouseStatus::Active)
    }
}

impl Default for GreenhouseStatus {
    fn default() -> Self {
        GreenhouseStatus::Active
    }
}

impl fmt::Display for GreenhouseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greenhouse as returned by reads.
///
/// `total_zones` and `active_zones` are aggregated from the zone table at query
/// time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greenhouse {
    pub id: GreenhouseId,
    pub name: String,
    pub description: Option<String>,
    pub status: GreenhouseStatus,
    pub operator_id: OperatorId,
    pub total_zones: i64,
    pub active_zones: i64,
    pub operator: Option<OperatorSummary>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Lightweight projection used by dropdowns and dashboards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreenhouseSummary {
    pub id: GreenhouseId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreenhouseFilter {
    All,
    Active,
    ByOperator(OperatorId),
}

/// Payload for creating a greenhouse. New greenhouses start `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewGreenhouse {
    #[validate(length(min = 1, max = 100, message = "Greenhouse name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Operator id must be a positive integer"))]
    pub operator_id: OperatorId,
}

impl NewGreenhouse {
    pub fn new(
        name: String,
        description: Option<String>,
        operator_id: OperatorId,
    ) -> Result<Self, validator::ValidationErrors> {
        let greenhouse = Self {
            name: name.trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            operator_id,
        };

        greenhouse.validate()?;
        Ok(greenhouse)
    }
}

/// Partial update of the descriptive fields.
///
/// Status is deliberately absent: it only moves through guarded transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct GreenhouseChanges {
    #[validate(length(min = 1, max = 100, message = "Greenhouse name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Operator id must be a positive integer"))]
    pub operator_id: Option<OperatorId>,
}

impl GreenhouseChanges {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        operator_id: Option<OperatorId>,
    ) -> Result<Self, validator::ValidationErrors> {
        let changes = Self {
            name: name.map(|n| n.trim().to_string()),
            description: description.map(|d| d.trim().to_string()),
            operator_id,
        };

        changes.validate()?;
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.operator_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in GreenhouseStatus::ALL {
            assert_eq!(GreenhouseStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_accepts_legacy_names() {
        assert_eq!(GreenhouseStatus::from_str("activo"), Some(GreenhouseStatus::Active));
        assert_eq!(GreenhouseStatus::from_str("Inactivo"), Some(GreenhouseStatus::Inactive));
        assert_eq!(GreenhouseStatus::from_str("mantenimiento"), Some(GreenhouseStatus::Maintenance));
        assert_eq!(GreenhouseStatus::from_str("archived"), None);
        assert_eq!(GreenhouseStatus::from_str(""), None);
    }

    #[test]
    fn test_create_greenhouse_trims_fields() {
        let greenhouse = NewGreenhouse::new(
            "  North House ".to_string(),
            Some("   ".to_string()),
            3,
        )
        .unwrap();

        assert_eq!(greenhouse.name, "North House");
        assert_eq!(greenhouse.description, None);
    }

    #[test]
    fn test_create_greenhouse_rejects_blank_name() {
        assert!(NewGreenhouse::new("   ".to_string(), None, 1).is_err());
    }

    #[test]
    fn test_field_length_limits() {
        assert!(NewGreenhouse::new("n".repeat(100), Some("d".repeat(1000)), 1).is_ok());
        assert!(NewGreenhouse::new("n".repeat(101), None, 1).is_err());
        assert!(NewGreenhouse::new("North".to_string(), Some("d".repeat(1001)), 1).is_err());
        assert!(GreenhouseChanges::new(Some("n".repeat(101)), None, None).is_err());
    }

    #[test]
    fn test_create_greenhouse_rejects_non_positive_operator() {
        assert!(NewGreenhouse::new("South".to_string(), None, 0).is_err());
    }

    #[test]
    fn test_changes_empty() {
        assert!(GreenhouseChanges::default().is_empty());
        let changes = GreenhouseChanges::new(Some("East".to_string()), None, None).unwrap();
        assert!(!changes.is_empty());
    }
}
