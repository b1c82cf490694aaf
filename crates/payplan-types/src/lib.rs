//! # payplan-types
//!
//! Shared domain types for the payplan workspace: revenue events, plan
//! configuration, calculator results and read-model change events.
//!
//! Monetary values are [`Decimal`] throughout and serialize as strings.

pub mod binary;
pub mod cap;
pub mod dashboard;
pub mod events;
pub mod plan;
pub mod revenue;
pub mod split;

pub use rust_decimal::Decimal;

/// Opaque member identifier as issued by the backend.
pub type MemberId = String;

/// Backend row identifier of a mirrored revenue event.
pub type EventRef = String;

/// Days since the Unix epoch (UTC). Daily caps reset on this boundary.
pub type EpochDay = u64;

/// Seconds per day, used to derive [`EpochDay`] from a timestamp.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Convert a Unix timestamp in seconds into its UTC epoch day.
pub fn epoch_day(timestamp: u64) -> EpochDay {
    timestamp / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_day_boundaries() {
        assert_eq!(epoch_day(0), 0);
        assert_eq!(epoch_day(SECONDS_PER_DAY - 1), 0);
        assert_eq!(epoch_day(SECONDS_PER_DAY), 1);
        assert_eq!(epoch_day(1_700_000_000), 19_675);
    }

    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::split::RevenueSplit::export_all_to(&dir).expect("export RevenueSplit");
        crate::split::AiCreditSplit::export_all_to(&dir).expect("export AiCreditSplit");
        crate::binary::CycleEstimate::export_all_to(&dir).expect("export CycleEstimate");
        crate::cap::CapOutcome::export_all_to(&dir).expect("export CapOutcome");
        crate::dashboard::DashboardSnapshot::export_all_to(&dir).expect("export DashboardSnapshot");
        crate::events::Event::export_all_to(&dir).expect("export Event");
    }
}
