use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::RiskLevel;
use super::Timestamp;

/// Escalation stops climbing at this level; further triggers are absorbed.
pub const MAX_ESCALATION_LEVEL: u8 = 3;

/// A clinical alert raised against a profile.
///
/// While unresolved, the escalation level only climbs (capped at
/// [`MAX_ESCALATION_LEVEL`]). Resolution freezes the level and stamps
/// the resolution instant and notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAlert {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub provider_id: Uuid,
    pub severity: RiskLevel,
    pub escalation_level: u8,
    pub description: String,
    pub recommended_action: String,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub resolution_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl HealthAlert {
    #[allow(clippy::too_many_arguments)]
    pub fn raise(
        id: Uuid,
        profile_id: Uuid,
        provider_id: Uuid,
        severity: RiskLevel,
        description: String,
        recommended_action: String,
        now: Timestamp,
    ) -> Self {
        HealthAlert {
            id,
            profile_id,
            provider_id,
            severity,
            escalation_level: 1,
            description,
            recommended_action,
            resolved: false,
            resolved_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.resolved
    }

    /// Raise the escalation level by one, saturating at the cap.
    pub fn escalate(&mut self, now: Timestamp) {
        if self.escalation_level < MAX_ESCALATION_LEVEL {
            self.escalation_level += 1;
        }
        self.updated_at = now;
    }
}
