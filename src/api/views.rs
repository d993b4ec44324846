//! Response shapes: entities with every instant rendered as ISO-8601.
//!
//! At rest, instants are i64 nanoseconds; the conversion to strings
//! happens here and only here. A malformed stored instant renders as the
//! `unrepresentable` sentinel instead of failing the response.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::Page;
use crate::models::enums::{BloodType, RiskLevel, Trimester, VisitStatus};
use crate::models::{
    HealthAlert, HealthMetrics, HealthcareProvider, MaternalProfile, PrenatalVisit, Timestamp,
};

#[derive(Debug, Serialize)]
pub struct ProviderView {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub specialty: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<HealthcareProvider> for ProviderView {
    fn from(p: HealthcareProvider) -> Self {
        ProviderView {
            id: p.id,
            name: p.name,
            license_number: p.license_number,
            specialty: p.specialty,
            is_active: p.is_active,
            created_at: p.created_at.to_iso8601(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    pub blood_type: BloodType,
    pub due_date: String,
    pub current_trimester: Trimester,
    pub risk_level: RiskLevel,
    pub primary_care_provider_id: Uuid,
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
    pub is_high_risk_pregnancy: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MaternalProfile> for ProfileView {
    fn from(p: MaternalProfile) -> Self {
        ProfileView {
            id: p.id,
            name: p.name,
            age: p.age,
            blood_type: p.blood_type,
            due_date: p.due_date.to_iso8601(),
            current_trimester: p.current_trimester,
            risk_level: p.risk_level,
            primary_care_provider_id: p.primary_care_provider_id,
            medical_history: p.medical_history,
            allergies: p.allergies,
            is_high_risk_pregnancy: p.is_high_risk_pregnancy,
            created_at: p.created_at.to_iso8601(),
            updated_at: p.updated_at.to_iso8601(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsView {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub recorded_by_id: Uuid,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub hemoglobin: Option<f64>,
    pub notes: Option<String>,
    pub is_flagged_for_review: bool,
    pub recorded_at: String,
}

impl From<HealthMetrics> for MetricsView {
    fn from(m: HealthMetrics) -> Self {
        MetricsView {
            id: m.id,
            profile_id: m.profile_id,
            recorded_by_id: m.recorded_by_id,
            systolic_bp: m.systolic_bp,
            diastolic_bp: m.diastolic_bp,
            blood_sugar: m.blood_sugar,
            hemoglobin: m.hemoglobin,
            notes: m.notes,
            is_flagged_for_review: m.is_flagged_for_review,
            recorded_at: m.recorded_at.to_iso8601(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertView {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub provider_id: Uuid,
    pub severity: RiskLevel,
    pub escalation_level: u8,
    pub description: String,
    pub recommended_action: String,
    pub resolved: bool,
    pub resolved_at: Option<String>,
    pub resolution_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<HealthAlert> for AlertView {
    fn from(a: HealthAlert) -> Self {
        AlertView {
            id: a.id,
            profile_id: a.profile_id,
            provider_id: a.provider_id,
            severity: a.severity,
            escalation_level: a.escalation_level,
            description: a.description,
            recommended_action: a.recommended_action,
            resolved: a.resolved,
            resolved_at: a.resolved_at.map(Timestamp::to_iso8601),
            resolution_notes: a.resolution_notes,
            created_at: a.created_at.to_iso8601(),
            updated_at: a.updated_at.to_iso8601(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VisitView {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub provider_id: Uuid,
    pub scheduled_at: String,
    pub reason: Option<String>,
    pub status: VisitStatus,
    pub completed_at: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
}

impl From<PrenatalVisit> for VisitView {
    fn from(v: PrenatalVisit) -> Self {
        VisitView {
            id: v.id,
            profile_id: v.profile_id,
            provider_id: v.provider_id,
            scheduled_at: v.scheduled_at.to_iso8601(),
            reason: v.reason,
            status: v.status,
            completed_at: v.completed_at.map(Timestamp::to_iso8601),
            notes: v.notes,
            cancellation_reason: v.cancellation_reason,
            created_at: v.created_at.to_iso8601(),
        }
    }
}

/// One page of profiles with the full collection count.
#[derive(Debug, Serialize)]
pub struct ProfilePageView {
    pub data: Vec<ProfileView>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl From<Page<MaternalProfile>> for ProfilePageView {
    fn from(page: Page<MaternalProfile>) -> Self {
        ProfilePageView {
            data: page.data.into_iter().map(ProfileView::from).collect(),
            page: page.page,
            limit: page.limit,
            total: page.total,
        }
    }
}
