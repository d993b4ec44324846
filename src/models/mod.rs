pub mod alert;
pub mod enums;
pub mod metrics;
pub mod profile;
pub mod provider;
pub mod timestamp;
pub mod visit;

pub use alert::{HealthAlert, MAX_ESCALATION_LEVEL};
pub use enums::{BloodType, InvalidEnum, RiskLevel, Trimester, VisitStatus};
pub use metrics::{HealthMetrics, NewMetrics};
pub use profile::{MaternalProfile, NewProfile};
pub use provider::{HealthcareProvider, NewProvider};
pub use timestamp::{Timestamp, NANOS_PER_MILLI, UNREPRESENTABLE};
pub use visit::{NewVisit, PrenatalVisit};
