//! Profile risk synchronizer: reconciles a profile's stored trimester and
//! risk level with the current time and the profile's open alerts.
//!
//! Runs after every metric-triggered alert decision and after every alert
//! resolution; also independently invocable. Persists only when a field
//! actually changed, so repeated runs without new input are no-ops.

use thiserror::Error;
use uuid::Uuid;

use crate::alerts;
use crate::models::{HealthAlert, MaternalProfile, RiskLevel, Timestamp, Trimester};
use crate::store::{EntityStore, StoreError};

/// Full-term gestation: 40 weeks, anchored at `due_date - 280 days`.
pub const GESTATION_DAYS: i64 = 280;

const FIRST_TRIMESTER_LAST_WEEK: i64 = 12;
const SECOND_TRIMESTER_LAST_WEEK: i64 = 26;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Profile not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trimester implied by a due date at a given instant.
///
/// Week = days since the gestation anchor / 7, 1-based. Weeks 1-12 read
/// FIRST, 13-26 SECOND, 27-40 THIRD; instants outside the window clamp to
/// the nearest trimester (pre-conception reads FIRST, overdue reads THIRD).
pub fn trimester_for(due_date: Timestamp, now: Timestamp) -> Trimester {
    let anchor = due_date.minus_days(GESTATION_DAYS);
    let week = now.days_since(anchor) / 7 + 1;

    if week <= FIRST_TRIMESTER_LAST_WEEK {
        Trimester::First
    } else if week <= SECOND_TRIMESTER_LAST_WEEK {
        Trimester::Second
    } else {
        Trimester::Third
    }
}

/// Reconcile one profile's derived fields and persist if anything moved.
pub fn sync_profile(
    profiles: &EntityStore<MaternalProfile>,
    alerts_store: &EntityStore<HealthAlert>,
    profile_id: Uuid,
    now: Timestamp,
) -> Result<MaternalProfile, SyncError> {
    let mut profile = profiles
        .get(&profile_id)?
        .ok_or(SyncError::NotFound(profile_id))?;

    let trimester = trimester_for(profile.due_date, now);
    let risk_level = alerts::open_alerts_for(alerts_store, profile_id)?
        .iter()
        .map(|a| a.severity)
        .max_by_key(|s| s.rank())
        .unwrap_or(RiskLevel::Low);
    let high_risk = risk_level == RiskLevel::High;

    let changed = profile.current_trimester != trimester
        || profile.risk_level != risk_level
        || profile.is_high_risk_pregnancy != high_risk;

    if changed {
        profile.current_trimester = trimester;
        profile.risk_level = risk_level;
        profile.is_high_risk_pregnancy = high_risk;
        profile.updated_at = now;
        profiles.put(&profile.id, &profile)?;
        tracing::info!(
            profile_id = %profile.id,
            risk = profile.risk_level.as_str(),
            trimester = profile.current_trimester.as_str(),
            "Profile synchronized"
        );
    }

    Ok(profile)
}
