use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

/// One immutable recorded set of vital-sign readings.
///
/// Snapshots never change after storage, with one exception: the review
/// flag, which is set iff the risk classifier returned HIGH for this
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub recorded_by_id: Uuid,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub hemoglobin: Option<f64>,
    pub notes: Option<String>,
    pub is_flagged_for_review: bool,
    pub recorded_at: Timestamp,
}

impl HealthMetrics {
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        id: Uuid,
        profile_id: Uuid,
        recorded_by_id: Uuid,
        systolic_bp: Option<f64>,
        diastolic_bp: Option<f64>,
        blood_sugar: Option<f64>,
        hemoglobin: Option<f64>,
        notes: Option<String>,
        now: Timestamp,
    ) -> Self {
        HealthMetrics {
            id,
            profile_id,
            recorded_by_id,
            systolic_bp,
            diastolic_bp,
            blood_sugar,
            hemoglobin,
            notes,
            is_flagged_for_review: false,
            recorded_at: now,
        }
    }

    pub fn flag_for_review(&mut self) {
        self.is_flagged_for_review = true;
    }
}

/// Draft metrics snapshot as decoded from the transport layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMetrics {
    pub profile_id: Uuid,
    pub recorded_by_id: Uuid,
    #[serde(default)]
    pub systolic_bp: Option<f64>,
    #[serde(default)]
    pub diastolic_bp: Option<f64>,
    #[serde(default)]
    pub blood_sugar: Option<f64>,
    #[serde(default)]
    pub hemoglobin: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}
