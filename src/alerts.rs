//! Alert lifecycle: create-or-escalate on HIGH verdicts, explicit
//! resolution, at-most-one-open-alert-per-profile.
//!
//! The manager owns every mutation of alert state. A HIGH verdict either
//! raises a fresh level-1 alert or escalates the profile's single open
//! one; it never creates a duplicate. Resolution freezes the escalation
//! level and stamps the instant and notes.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{HealthAlert, RiskLevel, Timestamp};
use crate::store::{EntityStore, StoreError};

/// Fixed alert text for metric-triggered alerts.
pub const ALERT_DESCRIPTION: &str = "Abnormal health metrics detected";
pub const ALERT_RECOMMENDED_ACTION: &str = "Immediate medical review required";

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(Uuid),

    #[error("Alert already resolved: {0}")]
    AlreadyResolved(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the lifecycle manager did with a classifier verdict.
#[derive(Debug, Clone)]
pub enum AlertDecision {
    /// LOW verdict; no alert touched.
    None,
    Created(HealthAlert),
    Escalated(HealthAlert),
}

/// The profile's currently open alert, if any.
pub fn open_alert_for(
    alerts: &EntityStore<HealthAlert>,
    profile_id: Uuid,
) -> Result<Option<HealthAlert>, StoreError> {
    for alert in alerts.scan()? {
        let alert = alert?;
        if alert.profile_id == profile_id && alert.is_open() {
            return Ok(Some(alert));
        }
    }
    Ok(None)
}

/// All open alerts for a profile.
pub fn open_alerts_for(
    alerts: &EntityStore<HealthAlert>,
    profile_id: Uuid,
) -> Result<Vec<HealthAlert>, StoreError> {
    let mut open = Vec::new();
    for alert in alerts.scan()? {
        let alert = alert?;
        if alert.profile_id == profile_id && alert.is_open() {
            open.push(alert);
        }
    }
    Ok(open)
}

/// Apply a classifier verdict for a just-recorded snapshot.
///
/// `alert_id` is the id the new alert receives if one is created;
/// `provider_id` is the snapshot's recording provider, who becomes
/// responsible for the alert.
pub fn apply_verdict(
    alerts: &EntityStore<HealthAlert>,
    profile_id: Uuid,
    provider_id: Uuid,
    verdict: RiskLevel,
    alert_id: Uuid,
    now: Timestamp,
) -> Result<AlertDecision, StoreError> {
    if verdict != RiskLevel::High {
        return Ok(AlertDecision::None);
    }

    match open_alert_for(alerts, profile_id)? {
        Some(mut alert) => {
            alert.escalate(now);
            alerts.put(&alert.id, &alert)?;
            tracing::info!(
                alert_id = %alert.id,
                profile_id = %profile_id,
                level = alert.escalation_level,
                "Open alert escalated"
            );
            Ok(AlertDecision::Escalated(alert))
        }
        None => {
            let alert = HealthAlert::raise(
                alert_id,
                profile_id,
                provider_id,
                RiskLevel::High,
                ALERT_DESCRIPTION.into(),
                ALERT_RECOMMENDED_ACTION.into(),
                now,
            );
            alerts.put(&alert.id, &alert)?;
            tracing::info!(
                alert_id = %alert.id,
                profile_id = %profile_id,
                "Alert raised for abnormal metrics"
            );
            Ok(AlertDecision::Created(alert))
        }
    }
}

/// Resolve an open alert, freezing its escalation level.
pub fn resolve(
    alerts: &EntityStore<HealthAlert>,
    alert_id: Uuid,
    notes: Option<String>,
    now: Timestamp,
) -> Result<HealthAlert, AlertError> {
    let mut alert = alerts
        .get(&alert_id)?
        .ok_or(AlertError::NotFound(alert_id))?;

    if alert.resolved {
        return Err(AlertError::AlreadyResolved(alert_id));
    }

    alert.resolved = true;
    alert.resolved_at = Some(now);
    alert.resolution_notes = notes;
    alert.updated_at = now;
    alerts.put(&alert.id, &alert)?;

    tracing::info!(alert_id = %alert.id, profile_id = %alert.profile_id, "Alert resolved");
    Ok(alert)
}
