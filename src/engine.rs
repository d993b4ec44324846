//! The synchronous command surface over the risk engine.
//!
//! `CareEngine` is what every transport talks to: it owns the store
//! façade, the injected id/clock sources, and the per-profile lock
//! registry that serializes read-modify-write sequences touching the
//! same profile. Commands either complete synchronously or fail with a
//! value from the error taxonomy below.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::alerts::{self, AlertError};
use crate::models::enums::BloodType;
use crate::models::{
    HealthAlert, HealthMetrics, HealthcareProvider, MaternalProfile, NewMetrics, NewProfile,
    NewProvider, NewVisit, PrenatalVisit, RiskLevel, Timestamp, VisitStatus,
};
use crate::risk;
use crate::store::{RecordStore, StoreError, StoreFacade};
use crate::sync::{self, SyncError};
use crate::validation::{self, ValidationError};

// ═══════════════════════════════════════════════════════════
// Error taxonomy
// ═══════════════════════════════════════════════════════════

/// Engine failures. Everything except `Storage` is recoverable and maps
/// to a caller mistake; `Storage` is the one fatal condition.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Provider not active: {id}")]
    ProviderInactive { id: Uuid },

    #[error("Alert already resolved: {id}")]
    AlreadyResolved { id: Uuid },

    #[error("Visit {id} is {status:?}, not scheduled")]
    VisitNotPending { id: Uuid, status: VisitStatus },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl EngineError {
    fn not_found(entity: &'static str, id: Uuid) -> Self {
        EngineError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable kind for the wire contract.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::NotFound { .. } => "not_found",
            EngineError::ProviderInactive { .. } | EngineError::AlreadyResolved { .. } => {
                "precondition_failed"
            }
            EngineError::VisitNotPending { .. } => "precondition_failed",
            EngineError::Storage(_) => "storage_unavailable",
        }
    }
}

impl From<AlertError> for EngineError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::NotFound(id) => EngineError::not_found("alert", id),
            AlertError::AlreadyResolved(id) => EngineError::AlreadyResolved { id },
            AlertError::Store(e) => EngineError::Storage(e),
        }
    }
}

impl From<SyncError> for EngineError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotFound(id) => EngineError::not_found("profile", id),
            SyncError::Store(e) => EngineError::Storage(e),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════

/// One page of a list operation. `total` is the full collection count,
/// independent of the requested slice.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

// ═══════════════════════════════════════════════════════════
// CareEngine
// ═══════════════════════════════════════════════════════════

type IdSource = dyn Fn() -> Uuid + Send + Sync;
type ClockSource = dyn Fn() -> Timestamp + Send + Sync;

pub struct CareEngine {
    store: StoreFacade,
    ids: Box<IdSource>,
    clock: Box<ClockSource>,
    /// Per-profile mutexes serializing read-verdict-then-write sequences.
    profile_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CareEngine {
    /// Engine with the default id/clock sources (UUIDv4, system clock).
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        CareEngine::with_sources(store, Box::new(Uuid::new_v4), Box::new(Timestamp::now))
    }

    /// Engine with injected id/clock sources. Tests pin both.
    pub fn with_sources(
        store: Arc<dyn RecordStore>,
        ids: Box<IdSource>,
        clock: Box<ClockSource>,
    ) -> Self {
        CareEngine {
            store: StoreFacade::new(store),
            ids,
            clock,
            profile_locks: Mutex::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> Uuid {
        (self.ids)()
    }

    fn now(&self) -> Timestamp {
        (self.clock)()
    }

    fn profile_lock(&self, profile_id: Uuid) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self
            .profile_locks
            .lock()
            .map_err(|_| StoreError::Unavailable("profile lock registry poisoned".into()))?;
        Ok(Arc::clone(locks.entry(profile_id).or_default()))
    }

    // ── Providers ────────────────────────────────────────────

    pub fn create_provider(&self, draft: NewProvider) -> Result<HealthcareProvider, EngineError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError {
                field: "name",
                message: "name is required".into(),
            }
            .into());
        }
        if draft.license_number.trim().is_empty() {
            return Err(ValidationError {
                field: "license_number",
                message: "license number is required".into(),
            }
            .into());
        }

        let provider = HealthcareProvider::register(
            self.next_id(),
            draft.name,
            draft.license_number,
            draft.specialty,
            self.now(),
        );
        self.store.providers().put(&provider.id, &provider)?;
        tracing::info!(provider_id = %provider.id, "Provider registered");
        Ok(provider)
    }

    pub fn get_provider(&self, id: Uuid) -> Result<HealthcareProvider, EngineError> {
        self.store
            .providers()
            .get(&id)?
            .ok_or(EngineError::not_found("provider", id))
    }

    pub fn list_providers(&self) -> Result<Vec<HealthcareProvider>, EngineError> {
        let mut providers = self.store.providers().all()?;
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(providers)
    }

    /// Deactivate a provider. Idempotent: deactivating an inactive
    /// provider just returns it.
    pub fn deactivate_provider(&self, id: Uuid) -> Result<HealthcareProvider, EngineError> {
        let mut provider = self.get_provider(id)?;
        if provider.is_active {
            provider.is_active = false;
            self.store.providers().put(&provider.id, &provider)?;
            tracing::info!(provider_id = %provider.id, "Provider deactivated");
        }
        Ok(provider)
    }

    /// Provider that must exist and be active to be assignable.
    fn active_provider(&self, id: Uuid) -> Result<HealthcareProvider, EngineError> {
        let provider = self.get_provider(id)?;
        if !provider.is_active {
            return Err(EngineError::ProviderInactive { id });
        }
        Ok(provider)
    }

    // ── Profiles ─────────────────────────────────────────────

    pub fn create_profile(&self, draft: NewProfile) -> Result<MaternalProfile, EngineError> {
        validation::validate_profile(&draft)?;

        // Both parses were vetted by validation above.
        let blood_type: BloodType = draft.blood_type.parse().map_err(|_| ValidationError {
            field: "blood_type",
            message: format!("unrecognized blood type: {}", draft.blood_type),
        })?;
        let due_date = Timestamp::parse_iso8601(&draft.due_date).ok_or(ValidationError {
            field: "due_date",
            message: "must be an ISO-8601 instant".into(),
        })?;

        let provider = self.active_provider(draft.primary_care_provider_id)?;

        let now = self.now();
        let profile = MaternalProfile::create(
            self.next_id(),
            draft.name,
            draft.age,
            blood_type,
            due_date,
            sync::trimester_for(due_date, now),
            provider.id,
            draft.medical_history,
            draft.allergies,
            now,
        );
        self.store.profiles().put(&profile.id, &profile)?;
        tracing::info!(profile_id = %profile.id, "Maternal profile created");
        Ok(profile)
    }

    pub fn get_profile(&self, id: Uuid) -> Result<MaternalProfile, EngineError> {
        self.store
            .profiles()
            .get(&id)?
            .ok_or(EngineError::not_found("profile", id))
    }

    pub fn list_profiles(&self, page: u64, limit: u64) -> Result<Page<MaternalProfile>, EngineError> {
        if page < 1 {
            return Err(ValidationError {
                field: "page",
                message: "page is 1-indexed".into(),
            }
            .into());
        }
        if limit < 1 {
            return Err(ValidationError {
                field: "limit",
                message: "limit must be at least 1".into(),
            }
            .into());
        }

        let total = self.store.profiles().count()?;
        let skip = (page - 1).saturating_mul(limit);

        let mut data = Vec::new();
        for profile in self.store.profiles().scan()?.skip(skip as usize) {
            data.push(profile?);
            if data.len() as u64 == limit {
                break;
            }
        }

        Ok(Page {
            data,
            page,
            limit,
            total,
        })
    }

    /// Reconcile a profile's trimester and risk level with current state.
    pub fn sync_profile(&self, id: Uuid) -> Result<MaternalProfile, EngineError> {
        let lock = self.profile_lock(id)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("profile lock poisoned".into()))?;

        Ok(sync::sync_profile(
            &self.store.profiles(),
            &self.store.alerts(),
            id,
            self.now(),
        )?)
    }

    // ── Metrics ──────────────────────────────────────────────

    /// Record a vital-sign snapshot, classify it, and maintain alert and
    /// profile state. The whole read-classify-write sequence runs under
    /// the profile's key lock.
    pub fn record_metrics(&self, draft: NewMetrics) -> Result<HealthMetrics, EngineError> {
        validation::validate_metrics(&draft)?;

        let lock = self.profile_lock(draft.profile_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("profile lock poisoned".into()))?;

        let profile = self.get_profile(draft.profile_id)?;
        let recorder = self.active_provider(draft.recorded_by_id)?;

        let now = self.now();
        let mut metrics = HealthMetrics::record(
            self.next_id(),
            profile.id,
            recorder.id,
            draft.systolic_bp,
            draft.diastolic_bp,
            draft.blood_sugar,
            draft.hemoglobin,
            draft.notes,
            now,
        );

        let verdict = risk::classify(&metrics);
        if verdict == RiskLevel::High {
            metrics.flag_for_review();
        }

        // Alert state first: a flagged snapshot must never land in the
        // store without its alert already existing.
        alerts::apply_verdict(
            &self.store.alerts(),
            profile.id,
            recorder.id,
            verdict,
            self.next_id(),
            now,
        )?;
        self.store.metrics().put(&metrics.id, &metrics)?;
        sync::sync_profile(&self.store.profiles(), &self.store.alerts(), profile.id, now)?;

        tracing::info!(
            metrics_id = %metrics.id,
            profile_id = %profile.id,
            verdict = verdict.as_str(),
            "Metrics snapshot recorded"
        );
        Ok(metrics)
    }

    /// Snapshots for a profile, newest first.
    pub fn list_metrics(&self, profile_id: Uuid) -> Result<Vec<HealthMetrics>, EngineError> {
        self.get_profile(profile_id)?;
        let mut snapshots = Vec::new();
        for metrics in self.store.metrics().scan()? {
            let metrics = metrics?;
            if metrics.profile_id == profile_id {
                snapshots.push(metrics);
            }
        }
        snapshots.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(snapshots)
    }

    // ── Alerts ───────────────────────────────────────────────

    /// Alerts for a profile, newest first. `open_only` hides resolved ones.
    pub fn list_alerts(
        &self,
        profile_id: Uuid,
        open_only: bool,
    ) -> Result<Vec<HealthAlert>, EngineError> {
        self.get_profile(profile_id)?;
        let mut matching = Vec::new();
        for alert in self.store.alerts().scan()? {
            let alert = alert?;
            if alert.profile_id == profile_id && (!open_only || alert.is_open()) {
                matching.push(alert);
            }
        }
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    /// Resolve an alert and re-synchronize the owning profile so its
    /// stored risk level reflects the remaining open alerts.
    pub fn resolve_alert(
        &self,
        alert_id: Uuid,
        notes: Option<String>,
    ) -> Result<HealthAlert, EngineError> {
        let alert = self
            .store
            .alerts()
            .get(&alert_id)?
            .ok_or(EngineError::not_found("alert", alert_id))?;

        let lock = self.profile_lock(alert.profile_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable("profile lock poisoned".into()))?;

        let now = self.now();
        let resolved = alerts::resolve(&self.store.alerts(), alert_id, notes, now)?;
        sync::sync_profile(
            &self.store.profiles(),
            &self.store.alerts(),
            resolved.profile_id,
            now,
        )?;
        Ok(resolved)
    }

    // ── Visits ───────────────────────────────────────────────

    pub fn schedule_visit(&self, draft: NewVisit) -> Result<PrenatalVisit, EngineError> {
        let scheduled_at = Timestamp::parse_iso8601(&draft.scheduled_at).ok_or(ValidationError {
            field: "scheduled_at",
            message: "must be an ISO-8601 instant".into(),
        })?;

        let profile = self.get_profile(draft.profile_id)?;
        let provider = self.active_provider(draft.provider_id)?;

        let visit = PrenatalVisit::schedule(
            self.next_id(),
            profile.id,
            provider.id,
            scheduled_at,
            draft.reason,
            self.now(),
        );
        self.store.visits().put(&visit.id, &visit)?;
        tracing::info!(visit_id = %visit.id, profile_id = %profile.id, "Visit scheduled");
        Ok(visit)
    }

    pub fn complete_visit(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<PrenatalVisit, EngineError> {
        let mut visit = self
            .store
            .visits()
            .get(&id)?
            .ok_or(EngineError::not_found("visit", id))?;

        if visit.status != VisitStatus::Scheduled {
            return Err(EngineError::VisitNotPending {
                id,
                status: visit.status,
            });
        }

        visit.status = VisitStatus::Completed;
        visit.completed_at = Some(self.now());
        visit.notes = notes;
        self.store.visits().put(&visit.id, &visit)?;
        Ok(visit)
    }

    pub fn cancel_visit(&self, id: Uuid, reason: String) -> Result<PrenatalVisit, EngineError> {
        let mut visit = self
            .store
            .visits()
            .get(&id)?
            .ok_or(EngineError::not_found("visit", id))?;

        if visit.status != VisitStatus::Scheduled {
            return Err(EngineError::VisitNotPending {
                id,
                status: visit.status,
            });
        }

        visit.status = VisitStatus::Cancelled;
        visit.cancellation_reason = Some(reason);
        self.store.visits().put(&visit.id, &visit)?;
        Ok(visit)
    }

    /// Visits for a profile, soonest scheduled first.
    pub fn list_visits(&self, profile_id: Uuid) -> Result<Vec<PrenatalVisit>, EngineError> {
        self.get_profile(profile_id)?;
        let mut visits = Vec::new();
        for visit in self.store.visits().scan()? {
            let visit = visit?;
            if visit.profile_id == profile_id {
                visits.push(visit);
            }
        }
        visits.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(visits)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trimester;
    use crate::store::MemoryStore;

    fn engine() -> CareEngine {
        CareEngine::new(Arc::new(MemoryStore::new()))
    }

    fn provider_draft(name: &str) -> NewProvider {
        NewProvider {
            name: name.into(),
            license_number: "LIC-2291".into(),
            specialty: Some("Obstetrics".into()),
        }
    }

    fn profile_draft(provider_id: Uuid) -> NewProfile {
        NewProfile {
            name: "Naya Osei".into(),
            age: 29,
            blood_type: "O+".into(),
            due_date: Timestamp::now().plus_days(280).to_iso8601(),
            primary_care_provider_id: provider_id,
            medical_history: vec![],
            allergies: vec![],
        }
    }

    fn metrics_draft(profile_id: Uuid, recorder_id: Uuid) -> NewMetrics {
        NewMetrics {
            profile_id,
            recorded_by_id: recorder_id,
            systolic_bp: Some(120.0),
            diastolic_bp: Some(80.0),
            blood_sugar: Some(95.0),
            hemoglobin: Some(12.5),
            notes: None,
        }
    }

    /// Provider + profile, ready for metric recording.
    fn seeded(engine: &CareEngine) -> (HealthcareProvider, MaternalProfile) {
        let provider = engine.create_provider(provider_draft("Dr. Amina Diallo")).unwrap();
        let profile = engine.create_profile(profile_draft(provider.id)).unwrap();
        (provider, profile)
    }

    // ── Providers ────────────────────────────────────────────

    #[test]
    fn provider_round_trip() {
        let engine = engine();
        let created = engine.create_provider(provider_draft("Dr. A")).unwrap();
        let loaded = engine.get_provider(created.id).unwrap();
        assert!(loaded.is_active);
        assert_eq!(loaded.license_number, "LIC-2291");
    }

    #[test]
    fn provider_requires_name_and_license() {
        let engine = engine();
        let mut draft = provider_draft("  ");
        assert!(matches!(
            engine.create_provider(draft.clone()),
            Err(EngineError::Validation(_))
        ));
        draft.name = "Dr. A".into();
        draft.license_number = "".into();
        assert!(matches!(
            engine.create_provider(draft),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn deactivation_is_idempotent() {
        let engine = engine();
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        assert!(!engine.deactivate_provider(provider.id).unwrap().is_active);
        assert!(!engine.deactivate_provider(provider.id).unwrap().is_active);
    }

    #[test]
    fn providers_list_sorted_by_name() {
        let engine = engine();
        engine.create_provider(provider_draft("Dr. Zheng")).unwrap();
        engine.create_provider(provider_draft("Dr. Abara")).unwrap();
        let names: Vec<String> = engine
            .list_providers()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Dr. Abara", "Dr. Zheng"]);
    }

    // ── Profiles ─────────────────────────────────────────────

    #[test]
    fn new_profile_is_low_risk_first_trimester() {
        let engine = engine();
        let (_, profile) = seeded(&engine);
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert_eq!(profile.current_trimester, Trimester::First);
        assert!(!profile.is_high_risk_pregnancy);
    }

    #[test]
    fn profile_with_unknown_provider_fails() {
        let engine = engine();
        let result = engine.create_profile(profile_draft(Uuid::new_v4()));
        assert!(matches!(result, Err(EngineError::NotFound { entity: "provider", .. })));
    }

    #[test]
    fn profile_with_inactive_provider_fails_and_persists_nothing() {
        let engine = engine();
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        engine.deactivate_provider(provider.id).unwrap();

        let err = engine.create_profile(profile_draft(provider.id)).unwrap_err();
        assert!(matches!(&err, EngineError::ProviderInactive { .. }));
        assert_eq!(err.kind(), "precondition_failed");
        assert_eq!(engine.list_profiles(1, 10).unwrap().total, 0);
    }

    #[test]
    fn profile_validation_happens_before_provider_lookup() {
        let engine = engine();
        let mut draft = profile_draft(Uuid::new_v4());
        draft.age = 12;
        // Provider doesn't exist either, but validation reports first.
        assert!(matches!(
            engine.create_profile(draft),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn get_profile_unknown_is_not_found() {
        let engine = engine();
        let err = engine.get_profile(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    // ── Pagination ───────────────────────────────────────────

    #[test]
    fn second_page_of_fifteen_profiles_has_five() {
        let engine = engine();
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        for _ in 0..15 {
            engine.create_profile(profile_draft(provider.id)).unwrap();
        }

        let page = engine.list_profiles(2, 10).unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn page_past_the_end_is_empty_with_full_total() {
        let engine = engine();
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        for _ in 0..3 {
            engine.create_profile(profile_draft(provider.id)).unwrap();
        }
        let page = engine.list_profiles(5, 10).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn pagination_rejects_zero_page_and_limit() {
        let engine = engine();
        assert!(matches!(
            engine.list_profiles(0, 10),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            engine.list_profiles(1, 0),
            Err(EngineError::Validation(_))
        ));
    }

    // ── Metrics + alert lifecycle ────────────────────────────

    #[test]
    fn high_snapshot_is_flagged_with_one_level_one_alert() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let mut draft = metrics_draft(profile.id, provider.id);
        draft.systolic_bp = Some(150.0);
        draft.diastolic_bp = Some(95.0);
        draft.blood_sugar = Some(100.0);
        draft.hemoglobin = Some(12.0);

        let metrics = engine.record_metrics(draft).unwrap();
        assert!(metrics.is_flagged_for_review);

        let open = engine.list_alerts(profile.id, true).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].severity, RiskLevel::High);
        assert_eq!(open[0].escalation_level, 1);
        assert_eq!(open[0].provider_id, provider.id);
    }

    #[test]
    fn high_snapshot_raises_profile_risk() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let mut draft = metrics_draft(profile.id, provider.id);
        draft.hemoglobin = Some(8.0);
        engine.record_metrics(draft).unwrap();

        let profile = engine.get_profile(profile.id).unwrap();
        assert_eq!(profile.risk_level, RiskLevel::High);
        assert!(profile.is_high_risk_pregnancy);
    }

    #[test]
    fn normal_snapshot_stays_unflagged_without_alert() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let metrics = engine
            .record_metrics(metrics_draft(profile.id, provider.id))
            .unwrap();
        assert!(!metrics.is_flagged_for_review);
        assert!(engine.list_alerts(profile.id, false).unwrap().is_empty());
        assert_eq!(
            engine.get_profile(profile.id).unwrap().risk_level,
            RiskLevel::Low
        );
    }

    #[test]
    fn consecutive_highs_escalate_one_open_alert() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        for _ in 0..2 {
            let mut draft = metrics_draft(profile.id, provider.id);
            draft.systolic_bp = Some(150.0);
            engine.record_metrics(draft).unwrap();
        }

        let open = engine.list_alerts(profile.id, true).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].escalation_level, 2);
    }

    #[test]
    fn metrics_for_unknown_profile_fail() {
        let engine = engine();
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        let result = engine.record_metrics(metrics_draft(Uuid::new_v4(), provider.id));
        assert!(matches!(result, Err(EngineError::NotFound { entity: "profile", .. })));
    }

    #[test]
    fn metrics_by_inactive_recorder_fail() {
        let engine = engine();
        let (_, profile) = seeded(&engine);
        let recorder = engine.create_provider(provider_draft("Dr. B")).unwrap();
        engine.deactivate_provider(recorder.id).unwrap();

        let result = engine.record_metrics(metrics_draft(profile.id, recorder.id));
        assert!(matches!(result, Err(EngineError::ProviderInactive { .. })));
        assert!(engine.list_metrics(profile.id).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_reading_is_rejected() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);
        let mut draft = metrics_draft(profile.id, provider.id);
        draft.blood_sugar = Some(600.0);
        assert!(matches!(
            engine.record_metrics(draft),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn metrics_list_is_newest_first() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);
        for _ in 0..3 {
            engine
                .record_metrics(metrics_draft(profile.id, provider.id))
                .unwrap();
        }
        let snapshots = engine.list_metrics(profile.id).unwrap();
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots[0].recorded_at >= snapshots[1].recorded_at);
        assert!(snapshots[1].recorded_at >= snapshots[2].recorded_at);
    }

    // ── Alert resolution ─────────────────────────────────────

    #[test]
    fn resolving_last_alert_returns_profile_to_low() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let mut draft = metrics_draft(profile.id, provider.id);
        draft.systolic_bp = Some(160.0);
        engine.record_metrics(draft).unwrap();

        let alert = engine.list_alerts(profile.id, true).unwrap().remove(0);
        let resolved = engine
            .resolve_alert(alert.id, Some("Repeat reading normal".into()))
            .unwrap();
        assert!(resolved.resolved);
        assert!(resolved.resolved_at.is_some());

        let profile = engine.get_profile(profile.id).unwrap();
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert!(!profile.is_high_risk_pregnancy);
    }

    #[test]
    fn resolving_twice_is_a_precondition_failure() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let mut draft = metrics_draft(profile.id, provider.id);
        draft.diastolic_bp = Some(100.0);
        engine.record_metrics(draft).unwrap();

        let alert = engine.list_alerts(profile.id, true).unwrap().remove(0);
        engine.resolve_alert(alert.id, None).unwrap();

        let err = engine.resolve_alert(alert.id, None).unwrap_err();
        assert!(matches!(&err, EngineError::AlreadyResolved { .. }));
        assert_eq!(err.kind(), "precondition_failed");
    }

    #[test]
    fn resolving_unknown_alert_is_not_found() {
        let engine = engine();
        let err = engine.resolve_alert(Uuid::new_v4(), None).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn sync_profile_is_idempotent_via_engine() {
        let engine = engine();
        let (_, profile) = seeded(&engine);
        let first = engine.sync_profile(profile.id).unwrap();
        let second = engine.sync_profile(profile.id).unwrap();
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.current_trimester, second.current_trimester);
        assert_eq!(first.updated_at, second.updated_at);
    }

    // ── Visits ───────────────────────────────────────────────

    fn visit_draft(profile_id: Uuid, provider_id: Uuid) -> NewVisit {
        NewVisit {
            profile_id,
            provider_id,
            scheduled_at: Timestamp::now().plus_days(14).to_iso8601(),
            reason: Some("Routine checkup".into()),
        }
    }

    #[test]
    fn visit_schedule_and_complete() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let visit = engine.schedule_visit(visit_draft(profile.id, provider.id)).unwrap();
        assert_eq!(visit.status, VisitStatus::Scheduled);

        let done = engine
            .complete_visit(visit.id, Some("All nominal".into()))
            .unwrap();
        assert_eq!(done.status, VisitStatus::Completed);
        assert!(done.completed_at.is_some());
    }

    #[test]
    fn visit_cancel_records_reason() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let visit = engine.schedule_visit(visit_draft(profile.id, provider.id)).unwrap();
        let cancelled = engine
            .cancel_visit(visit.id, "Patient rescheduled".into())
            .unwrap();
        assert_eq!(cancelled.status, VisitStatus::Cancelled);
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("Patient rescheduled")
        );
    }

    #[test]
    fn completed_visit_cannot_be_cancelled() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let visit = engine.schedule_visit(visit_draft(profile.id, provider.id)).unwrap();
        engine.complete_visit(visit.id, None).unwrap();

        let err = engine.cancel_visit(visit.id, "too late".into()).unwrap_err();
        assert!(matches!(&err, EngineError::VisitNotPending { .. }));
        assert_eq!(err.kind(), "precondition_failed");
    }

    #[test]
    fn visit_with_bad_instant_is_rejected() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);
        let mut draft = visit_draft(profile.id, provider.id);
        draft.scheduled_at = "next tuesday".into();
        assert!(matches!(
            engine.schedule_visit(draft),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn visits_list_soonest_first() {
        let engine = engine();
        let (provider, profile) = seeded(&engine);

        let mut late = visit_draft(profile.id, provider.id);
        late.scheduled_at = Timestamp::now().plus_days(30).to_iso8601();
        let mut soon = visit_draft(profile.id, provider.id);
        soon.scheduled_at = Timestamp::now().plus_days(7).to_iso8601();

        engine.schedule_visit(late).unwrap();
        engine.schedule_visit(soon).unwrap();

        let visits = engine.list_visits(profile.id).unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].scheduled_at <= visits[1].scheduled_at);
    }

    // ── Injected sources ─────────────────────────────────────

    #[test]
    fn injected_clock_and_ids_are_used() {
        let fixed_id = Uuid::new_v4();
        let engine = CareEngine::with_sources(
            Arc::new(MemoryStore::new()),
            Box::new(move || fixed_id),
            Box::new(|| Timestamp::from_nanos(42)),
        );
        let provider = engine.create_provider(provider_draft("Dr. A")).unwrap();
        assert_eq!(provider.id, fixed_id);
        assert_eq!(provider.created_at, Timestamp::from_nanos(42));
    }
}
