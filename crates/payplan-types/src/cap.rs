//! Daily earning caps.
//!
//! A member may be credited at most `cap` per UTC day. Anything beyond it
//! is flushed (forfeited to the system).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EpochDay, MemberId};

/// Earnings credited to a member so far today, against the configured cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct DailyEarningCap {
    #[ts(type = "string")]
    pub earned_today: Decimal,
    /// Zero or less means uncapped.
    #[ts(type = "string")]
    pub cap: Decimal,
}

/// A member's mirrored earnings for one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyEarnings {
    pub member_id: MemberId,
    pub day: EpochDay,
    pub earned: Decimal,
}

/// How an incoming commission is divided by the daily cap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct CapOutcome {
    /// Portion that fits under the cap.
    #[ts(type = "string")]
    pub credited: Decimal,
    /// Portion beyond the cap.
    #[ts(type = "string")]
    pub flushed: Decimal,
}
