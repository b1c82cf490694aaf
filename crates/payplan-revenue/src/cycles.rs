//! Binary cycle match estimate.
//!
//! A cycle completes when both legs carry `cycle_volume`. This module only
//! estimates progress for display; consuming volume and crediting cycle
//! commissions is done by the backend ledger.
//!
//! ```text
//! left_percent     = min(left / cycle_volume * 100, 100)
//! right_percent    = min(right / cycle_volume * 100, 100)
//! potential_cycles = floor(min(left, right) / cycle_volume)
//! ```
//!
//! A non-positive `cycle_volume` yields an all-zero estimate.

use payplan_types::binary::{BinaryLegState, CycleEstimate};
use payplan_types::plan::BinaryPlanConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ratio::{non_negative, progress_percent};

/// Estimate cycle progress from raw leg volumes.
pub fn estimate(left_volume: Decimal, right_volume: Decimal, cycle_volume: Decimal) -> CycleEstimate {
    if cycle_volume <= Decimal::ZERO {
        tracing::debug!(%cycle_volume, "cycle volume not positive, returning neutral estimate");
        return CycleEstimate::default();
    }

    let matched = non_negative(left_volume.min(right_volume));
    let potential_cycles = matched
        .checked_div(cycle_volume)
        .map(|c| c.floor())
        .and_then(|c| c.to_u64())
        .unwrap_or(u64::MAX);

    CycleEstimate {
        left_percent: progress_percent(left_volume, cycle_volume),
        right_percent: progress_percent(right_volume, cycle_volume),
        potential_cycles,
    }
}

/// Estimate cycle progress for a member's mirrored leg state.
pub fn estimate_legs(legs: &BinaryLegState, plan: &BinaryPlanConfig) -> CycleEstimate {
    estimate(legs.left_volume, legs.right_volume, plan.cycle_volume)
}

/// Commission the estimated cycles would pay, before any daily cap.
pub fn projected_payout(estimate: &CycleEstimate, plan: &BinaryPlanConfig) -> Decimal {
    let cycles = Decimal::from(estimate.potential_cycles);
    plan.cycle_payout.checked_mul(cycles).unwrap_or_else(|| {
        tracing::warn!(cycles = estimate.potential_cycles, "projected payout overflowed, using 0");
        Decimal::ZERO
    })
}

/// Volume the weaker leg still needs before the next cycle completes.
///
/// Returns 0 when `cycle_volume` is not positive.
pub fn volume_to_next_cycle(left_volume: Decimal, right_volume: Decimal, cycle_volume: Decimal) -> Decimal {
    if cycle_volume <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let matched = non_negative(left_volume.min(right_volume));
    cycle_volume - (matched % cycle_volume)
}
