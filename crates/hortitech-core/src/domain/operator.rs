//! Operator reference embedded in greenhouse reads

use serde::{Deserialize, Serialize};

use super::OperatorId;

/// The person responsible for a greenhouse. Owned by the user directory, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSummary {
    pub id: OperatorId,
    pub username: String,
    pub role: String,
    pub status: String,
}
