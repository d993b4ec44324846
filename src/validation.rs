//! Structural and range checks on incoming drafts, applied before any
//! draft reaches the engine proper. Pure: no clock, no store, no logging.
//!
//! All rules must hold; the first violation (in rule order) is reported.
//! Free-text fields are sanitized by the transport shell before they get
//! here — validation assumes `<`/`>` are already stripped.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::enums::BloodType;
use crate::models::{NewMetrics, NewProfile, Timestamp};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const HISTORY_ENTRY_MAX: usize = 1000;
pub const AGE_MIN: u8 = 16;
pub const AGE_MAX: u8 = 60;

pub const SYSTOLIC_RANGE: (f64, f64) = (70.0, 190.0);
pub const DIASTOLIC_RANGE: (f64, f64) = (40.0, 120.0);
pub const BLOOD_SUGAR_RANGE: (f64, f64) = (30.0, 500.0);

/// A rejected field with the reason. Always recoverable; surfaced
/// verbatim to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn invalid(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Check a profile draft. Rule order: name, medical history, age, blood
/// type, due date.
pub fn validate_profile(draft: &NewProfile) -> Result<(), ValidationError> {
    let name_len = draft.name.trim().chars().count();
    if name_len < NAME_MIN || name_len > NAME_MAX {
        return Err(invalid(
            "name",
            format!("must be {NAME_MIN}-{NAME_MAX} characters after trimming"),
        ));
    }

    for entry in &draft.medical_history {
        if entry.chars().count() > HISTORY_ENTRY_MAX {
            return Err(invalid(
                "medical_history",
                format!("entries must be at most {HISTORY_ENTRY_MAX} characters"),
            ));
        }
    }

    if draft.age < AGE_MIN || draft.age > AGE_MAX {
        return Err(invalid("age", format!("must be {AGE_MIN}-{AGE_MAX}")));
    }

    if BloodType::from_str(&draft.blood_type).is_err() {
        return Err(invalid(
            "blood_type",
            format!("unrecognized blood type: {}", draft.blood_type),
        ));
    }

    if Timestamp::parse_iso8601(&draft.due_date).is_none() {
        return Err(invalid("due_date", "must be an ISO-8601 instant"));
    }

    Ok(())
}

/// Check a metrics draft. Readings are optional; a present reading must
/// sit inside its plausible measurement range.
pub fn validate_metrics(draft: &NewMetrics) -> Result<(), ValidationError> {
    check_range("systolic_bp", draft.systolic_bp, SYSTOLIC_RANGE)?;
    check_range("diastolic_bp", draft.diastolic_bp, DIASTOLIC_RANGE)?;
    check_range("blood_sugar", draft.blood_sugar, BLOOD_SUGAR_RANGE)?;
    Ok(())
}

fn check_range(
    field: &'static str,
    reading: Option<f64>,
    (lo, hi): (f64, f64),
) -> Result<(), ValidationError> {
    match reading {
        Some(value) if !(lo..=hi).contains(&value) => {
            Err(invalid(field, format!("must be in [{lo}, {hi}]")))
        }
        _ => Ok(()),
    }
}
