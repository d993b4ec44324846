use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::VisitStatus;
use super::Timestamp;

/// A scheduled prenatal visit. Not touched by the risk engine; shares the
/// record store with the clinical entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrenatalVisit {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub provider_id: Uuid,
    pub scheduled_at: Timestamp,
    pub reason: Option<String>,
    pub status: VisitStatus,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
}

impl PrenatalVisit {
    pub fn schedule(
        id: Uuid,
        profile_id: Uuid,
        provider_id: Uuid,
        scheduled_at: Timestamp,
        reason: Option<String>,
        now: Timestamp,
    ) -> Self {
        PrenatalVisit {
            id,
            profile_id,
            provider_id,
            scheduled_at,
            reason,
            status: VisitStatus::Scheduled,
            completed_at: None,
            notes: None,
            cancellation_reason: None,
            created_at: now,
        }
    }
}

/// Draft visit as decoded from the transport layer. The schedule instant
/// arrives as an ISO-8601 string and is parsed at the engine boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewVisit {
    pub profile_id: Uuid,
    pub provider_id: Uuid,
    pub scheduled_at: String,
    #[serde(default)]
    pub reason: Option<String>,
}
