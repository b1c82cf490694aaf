//! Computed read-model figures for display code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::binary::CycleEstimate;
use crate::cap::CapOutcome;
use crate::revenue::RevenueKind;
use crate::split::RevenueSplit;
use crate::MemberId;

/// Completed sales of one kind, with its share of all completed sales.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct SalesLine {
    pub kind: RevenueKind,
    #[ts(type = "string")]
    pub total: Decimal,
    /// Percentage of all completed sales; 0 when there are none.
    #[ts(type = "string")]
    pub share_percent: Decimal,
}

/// Everything a member's earnings dashboard shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct DashboardSnapshot {
    pub member_id: MemberId,
    /// Completed sales per kind.
    pub sales: Vec<SalesLine>,
    #[ts(type = "string")]
    pub total_sales: Decimal,
    /// Split of all completed revenue, summed per event.
    pub revenue_split: RevenueSplit,
    pub cycles: CycleEstimate,
    /// `potential_cycles * cycle_payout`, before the daily cap.
    #[ts(type = "string")]
    pub projected_binary_payout: Decimal,
    /// The projected payout divided by what is left of today's cap.
    pub binary_after_cap: CapOutcome,
    #[ts(type = "string")]
    pub earned_today: Decimal,
    /// Progress towards today's cap, clamped to 100.
    #[ts(type = "string")]
    pub cap_progress_percent: Decimal,
    /// `false` when the commission percentages do not sum to 100.
    pub percentages_balanced: bool,
    /// Unix timestamp at which this snapshot was computed.
    pub computed_at: u64,
}
