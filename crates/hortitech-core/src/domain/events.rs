//! Real-time events published after successful mutations

use serde::Serialize;

use super::{GreenhouseId, GreenhouseStatus, ZoneId, ZoneStatus};

/// A room a real-time client joins, chosen from its declared role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    Admin,
    Operator,
}

impl Room {
    pub fn from_role(role: &str) -> Option<Self> {
        match role.trim().to_lowercase().as_str() {
            "admin" => Some(Room::Admin),
            "operario" | "operator" => Some(Room::Operator),
            _ => None,
        }
    }
}

/// Who receives a broadcast. Operators only ever hear what everyone hears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Admin,
    All,
}

impl Audience {
    pub fn reaches(&self, room: Room) -> bool {
        match self {
            Audience::All => true,
            Audience::Admin => room == Room::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum DomainEvent {
    GreenhouseCreated { greenhouse_id: GreenhouseId, name: String },
    GreenhouseUpdated { greenhouse_id: GreenhouseId },
    GreenhouseStatusChanged { greenhouse_id: GreenhouseId, status: GreenhouseStatus },
    GreenhouseDeleted { greenhouse_id: GreenhouseId },
    ZoneCreated { zone_id: ZoneId, greenhouse_id: GreenhouseId },
    ZoneStatusChanged { zone_id: ZoneId, greenhouse_id: GreenhouseId, status: ZoneStatus },
    ZoneDeleted { zone_id: ZoneId, greenhouse_id: GreenhouseId },
}

impl DomainEvent {
    /// Record-level changes go to administrators; status changes concern operators too.
    pub fn audience(&self) -> Audience {
        match self {
            DomainEvent::GreenhouseCreated { .. }
            | DomainEvent::GreenhouseUpdated { .. }
            | DomainEvent::GreenhouseDeleted { .. } => Audience::Admin,
            DomainEvent::GreenhouseStatusChanged { .. }
            | DomainEvent::ZoneCreated { .. }
            | DomainEvent::ZoneStatusChanged { .. }
            | DomainEvent::ZoneDeleted { .. } => Audience::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_from_role() {
        assert_eq!(Room::from_role("admin"), Some(Room::Admin));
        assert_eq!(Room::from_role("operario"), Some(Room::Operator));
        assert_eq!(Room::from_role("Operator"), Some(Room::Operator));
        assert_eq!(Room::from_role("guest"), None);
    }

    #[test]
    fn test_audience_reaches_rooms() {
        assert!(Audience::All.reaches(Room::Admin));
        assert!(Audience::All.reaches(Room::Operator));
        assert!(Audience::Admin.reaches(Room::Admin));
        assert!(!Audience::Admin.reaches(Room::Operator));
    }

    #[test]
    fn test_operators_hear_status_and_zone_events_only() {
        let heard_by_operators = |event: DomainEvent| event.audience().reaches(Room::Operator);

        assert!(heard_by_operators(DomainEvent::GreenhouseStatusChanged {
            greenhouse_id: 1,
            status: GreenhouseStatus::Inactive,
        }));
        assert!(heard_by_operators(DomainEvent::ZoneCreated { zone_id: 2, greenhouse_id: 1 }));
        assert!(!heard_by_operators(DomainEvent::GreenhouseCreated {
            greenhouse_id: 1,
            name: "North".to_string(),
        }));
        assert!(!heard_by_operators(DomainEvent::GreenhouseDeleted { greenhouse_id: 1 }));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = DomainEvent::GreenhouseStatusChanged {
            greenhouse_id: 5,
            status: GreenhouseStatus::Maintenance,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "greenhouse_status_changed");
        assert_eq!(json["payload"]["greenhouse_id"], 5);
        assert_eq!(json["payload"]["status"], "maintenance");
    }
}
