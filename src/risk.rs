//! Risk classifier: maps one metrics snapshot to a risk verdict.
//!
//! Deterministic OR of threshold triggers; callable in isolation. The
//! rule set has no MEDIUM path — MEDIUM exists in the enum for profile
//! and alert state but no combination of readings produces it here.

use crate::models::{HealthMetrics, RiskLevel};

pub const SYSTOLIC_HIGH: f64 = 140.0;
pub const DIASTOLIC_HIGH: f64 = 90.0;
pub const BLOOD_SUGAR_HIGH: f64 = 140.0;
pub const HEMOGLOBIN_LOW: f64 = 9.0;

/// Classify a snapshot. HIGH if any trigger fires, LOW otherwise.
/// Absent readings never trigger.
pub fn classify(metrics: &HealthMetrics) -> RiskLevel {
    let triggered = at_least(metrics.systolic_bp, SYSTOLIC_HIGH)
        || at_least(metrics.diastolic_bp, DIASTOLIC_HIGH)
        || above(metrics.blood_sugar, BLOOD_SUGAR_HIGH)
        || below(metrics.hemoglobin, HEMOGLOBIN_LOW);

    if triggered {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

fn at_least(reading: Option<f64>, threshold: f64) -> bool {
    reading.is_some_and(|v| v >= threshold)
}

fn above(reading: Option<f64>, threshold: f64) -> bool {
    reading.is_some_and(|v| v > threshold)
}

fn below(reading: Option<f64>, threshold: f64) -> bool {
    reading.is_some_and(|v| v < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use uuid::Uuid;

    fn snapshot(
        systolic: Option<f64>,
        diastolic: Option<f64>,
        sugar: Option<f64>,
        hemoglobin: Option<f64>,
    ) -> HealthMetrics {
        HealthMetrics::record(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            systolic,
            diastolic,
            sugar,
            hemoglobin,
            None,
            Timestamp::from_nanos(0),
        )
    }

    #[test]
    fn all_readings_in_range_is_low() {
        let m = snapshot(Some(120.0), Some(80.0), Some(95.0), Some(12.5));
        assert_eq!(classify(&m), RiskLevel::Low);
    }

    #[test]
    fn high_systolic_triggers() {
        // Inclusive threshold: 140 itself is already HIGH.
        assert_eq!(
            classify(&snapshot(Some(140.0), Some(80.0), Some(95.0), Some(12.5))),
            RiskLevel::High
        );
        assert_eq!(
            classify(&snapshot(Some(139.9), Some(80.0), Some(95.0), Some(12.5))),
            RiskLevel::Low
        );
    }

    #[test]
    fn high_diastolic_triggers() {
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(90.0), Some(95.0), Some(12.5))),
            RiskLevel::High
        );
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(89.9), Some(95.0), Some(12.5))),
            RiskLevel::Low
        );
    }

    #[test]
    fn high_blood_sugar_triggers() {
        // Exclusive threshold: 140 itself is still LOW.
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(80.0), Some(140.0), Some(12.5))),
            RiskLevel::Low
        );
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(80.0), Some(140.1), Some(12.5))),
            RiskLevel::High
        );
    }

    #[test]
    fn low_hemoglobin_triggers() {
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(80.0), Some(95.0), Some(8.9))),
            RiskLevel::High
        );
        assert_eq!(
            classify(&snapshot(Some(120.0), Some(80.0), Some(95.0), Some(9.0))),
            RiskLevel::Low
        );
    }

    #[test]
    fn triggers_are_order_independent() {
        // Any single trigger suffices regardless of the other readings.
        let m = snapshot(None, None, None, Some(7.0));
        assert_eq!(classify(&m), RiskLevel::High);
    }

    #[test]
    fn absent_readings_never_trigger() {
        assert_eq!(classify(&snapshot(None, None, None, None)), RiskLevel::Low);
    }

    #[test]
    fn no_rule_produces_medium() {
        // Documents current behavior: the rule set is binary. MEDIUM stays
        // representable in profile and alert state but is never a verdict.
        for systolic in [None, Some(100.0), Some(139.0), Some(150.0), Some(190.0)] {
            for sugar in [None, Some(100.0), Some(141.0)] {
                let verdict = classify(&snapshot(systolic, Some(80.0), sugar, Some(12.0)));
                assert_ne!(verdict, RiskLevel::Medium);
            }
        }
    }
}
