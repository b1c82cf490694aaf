//! Daily earning cap progress and flush.

use payplan_types::cap::{CapOutcome, DailyEarningCap};
use rust_decimal::Decimal;

use crate::ratio::{non_negative, progress_percent};

/// Progress towards today's cap: `min(earned / cap * 100, 100)`.
///
/// A cap of zero or less yields 0.
pub fn progress(cap: &DailyEarningCap) -> Decimal {
    if cap.cap <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    progress_percent(cap.earned_today, cap.cap)
}

/// Room left under today's cap, or `None` when uncapped.
pub fn headroom(cap: &DailyEarningCap) -> Option<Decimal> {
    if cap.cap <= Decimal::ZERO {
        return None;
    }
    Some(non_negative(cap.cap.saturating_sub(cap.earned_today)))
}

/// Divide an incoming commission into the credited and flushed parts.
///
/// Negative `incoming` is treated as 0. With no cap everything is credited.
pub fn apply(cap: &DailyEarningCap, incoming: Decimal) -> CapOutcome {
    let incoming = non_negative(incoming);
    let credited = match headroom(cap) {
        Some(room) => incoming.min(room),
        None => incoming,
    };
    let flushed = incoming - credited;

    if !flushed.is_zero() {
        tracing::debug!(%incoming, %credited, %flushed, "daily cap reached, flushing excess");
    }

    CapOutcome { credited, flushed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(earned: i64, limit: i64) -> DailyEarningCap {
        DailyEarningCap {
            earned_today: Decimal::from(earned),
            cap: Decimal::from(limit),
        }
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(&cap(250, 1000)), Decimal::from(25));
        assert_eq!(progress(&cap(1500, 1000)), Decimal::ONE_HUNDRED);
        assert_eq!(progress(&cap(0, 1000)), Decimal::ZERO);
    }

    #[test]
    fn test_progress_zero_cap() {
        assert_eq!(progress(&cap(250, 0)), Decimal::ZERO);
    }

    #[test]
    fn test_apply_under_cap() {
        let out = apply(&cap(200, 1000), Decimal::from(300));
        assert_eq!(out.credited, Decimal::from(300));
        assert_eq!(out.flushed, Decimal::ZERO);
    }

    #[test]
    fn test_apply_crosses_cap() {
        let out = apply(&cap(900, 1000), Decimal::from(300));
        assert_eq!(out.credited, Decimal::from(100));
        assert_eq!(out.flushed, Decimal::from(200));
    }

    #[test]
    fn test_apply_already_over_cap() {
        let out = apply(&cap(1200, 1000), Decimal::from(50));
        assert_eq!(out.credited, Decimal::ZERO);
        assert_eq!(out.flushed, Decimal::from(50));
    }

    #[test]
    fn test_apply_uncapped() {
        let out = apply(&cap(5000, 0), Decimal::from(50));
        assert_eq!(out.credited, Decimal::from(50));
        assert_eq!(out.flushed, Decimal::ZERO);
    }

    #[test]
    fn test_apply_negative_incoming() {
        let out = apply(&cap(0, 1000), Decimal::from(-20));
        assert_eq!(out, CapOutcome::default());
    }

    #[test]
    fn test_headroom() {
        assert_eq!(headroom(&cap(300, 1000)), Some(Decimal::from(700)));
        assert_eq!(headroom(&cap(1300, 1000)), Some(Decimal::ZERO));
        assert_eq!(headroom(&cap(1300, 0)), None);
    }

    #[test]
    fn test_headroom_saturates() {
        let extreme = DailyEarningCap {
            earned_today: Decimal::MIN,
            cap: Decimal::ONE,
        };
        assert_eq!(headroom(&extreme), Some(Decimal::MAX));
        assert_eq!(progress(&extreme), Decimal::ZERO);
        assert_eq!(apply(&extreme, Decimal::from(50)).credited, Decimal::from(50));
    }
}
