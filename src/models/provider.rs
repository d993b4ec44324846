use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

/// A healthcare provider who can be assigned to profiles, metrics
/// snapshots, visits, and alerts. Only active providers are assignable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthcareProvider {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub specialty: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl HealthcareProvider {
    pub fn register(
        id: Uuid,
        name: String,
        license_number: String,
        specialty: Option<String>,
        now: Timestamp,
    ) -> Self {
        HealthcareProvider {
            id,
            name,
            license_number,
            specialty,
            is_active: true,
            created_at: now,
        }
    }
}

/// Draft provider as decoded from the transport layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProvider {
    pub name: String,
    pub license_number: String,
    #[serde(default)]
    pub specialty: Option<String>,
}
