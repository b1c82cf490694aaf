//! Binary leg volumes and cycle estimates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::MemberId;

/// Which referral sub-tree a volume belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Leg {
    Left,
    Right,
}

/// Accumulated leg volumes for one member. Volumes grow externally;
/// payplan never consumes or resets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct BinaryLegState {
    pub member_id: MemberId,
    #[ts(type = "string")]
    pub left_volume: Decimal,
    #[ts(type = "string")]
    pub right_volume: Decimal,
    /// Unix timestamp of the last backend update.
    pub updated_at: u64,
}

impl BinaryLegState {
    /// The leg with less volume, or `None` when both are equal.
    pub fn weaker_leg(&self) -> Option<Leg> {
        match self.left_volume.cmp(&self.right_volume) {
            std::cmp::Ordering::Less => Some(Leg::Left),
            std::cmp::Ordering::Greater => Some(Leg::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Display estimate of binary cycle progress. Not an authoritative ledger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct CycleEstimate {
    /// Left leg progress towards one cycle, clamped to 100.
    #[ts(type = "string")]
    pub left_percent: Decimal,
    /// Right leg progress towards one cycle, clamped to 100.
    #[ts(type = "string")]
    pub right_percent: Decimal,
    /// `floor(min(left, right) / cycle_volume)`.
    pub potential_cycles: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legs(left: i64, right: i64) -> BinaryLegState {
        BinaryLegState {
            member_id: "m1".to_string(),
            left_volume: Decimal::from(left),
            right_volume: Decimal::from(right),
            updated_at: 0,
        }
    }

    #[test]
    fn test_weaker_leg() {
        assert_eq!(legs(2500, 1800).weaker_leg(), Some(Leg::Right));
        assert_eq!(legs(10, 20).weaker_leg(), Some(Leg::Left));
        assert_eq!(legs(5, 5).weaker_leg(), None);
    }
}
