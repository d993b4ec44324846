use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{BloodType, RiskLevel, Trimester};
use super::Timestamp;

/// A maternal patient profile.
///
/// `risk_level` mirrors the highest severity among the profile's open
/// alerts (LOW when none), and `current_trimester` mirrors the trimester
/// implied by `due_date` at the last synchronization. Both are maintained
/// by the profile risk synchronizer, never written directly by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaternalProfile {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub blood_type: BloodType,
    pub due_date: Timestamp,
    pub current_trimester: Trimester,
    pub risk_level: RiskLevel,
    pub primary_care_provider_id: Uuid,
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
    pub is_high_risk_pregnancy: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MaternalProfile {
    /// Construct a freshly created profile. Every field is enumerated here
    /// so entity invariants have a single choke point: new profiles start
    /// at LOW risk with no high-risk flag.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: Uuid,
        name: String,
        age: u8,
        blood_type: BloodType,
        due_date: Timestamp,
        current_trimester: Trimester,
        primary_care_provider_id: Uuid,
        medical_history: Vec<String>,
        allergies: Vec<String>,
        now: Timestamp,
    ) -> Self {
        MaternalProfile {
            id,
            name,
            age,
            blood_type,
            due_date,
            current_trimester,
            risk_level: RiskLevel::Low,
            primary_care_provider_id,
            medical_history,
            allergies,
            is_high_risk_pregnancy: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Draft profile as decoded from the transport layer. Blood type and due
/// date arrive as strings and are parsed at the engine boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProfile {
    pub name: String,
    pub age: u8,
    pub blood_type: String,
    pub due_date: String,
    pub primary_care_provider_id: Uuid,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}
