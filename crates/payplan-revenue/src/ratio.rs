//! Guarded percentage arithmetic.
//!
//! Dividing by a zero denominator yields 0 instead of an error, and any
//! overflow saturates to 0 with a warning. Results are normalized so that
//! `90.0` and `90` render the same.

use rust_decimal::Decimal;

/// `amount * percent / 100`.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    match amount
        .checked_mul(percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
    {
        Some(share) => share.normalize(),
        None => {
            tracing::warn!(%amount, %percent, "share overflowed, using 0");
            Decimal::ZERO
        }
    }
}

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part
        .checked_div(whole)
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(pct) => pct.normalize(),
        None => {
            tracing::warn!(%part, %whole, "ratio overflowed, using 0");
            Decimal::ZERO
        }
    }
}

/// [`ratio_percent`] clamped to `[0, 100]`.
pub fn progress_percent(part: Decimal, whole: Decimal) -> Decimal {
    ratio_percent(part, whole)
        .max(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
}

/// `max(0, value)`.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(Decimal::from(1000), Decimal::from(35)), Decimal::from(350));
        assert_eq!(percent_of(Decimal::from(1000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            percent_of(Decimal::new(1999, 2), Decimal::from(10)),
            Decimal::new(1999, 3)
        );
    }

    #[test]
    fn test_percent_of_overflow_is_zero() {
        assert_eq!(percent_of(Decimal::MAX, Decimal::from(50)), Decimal::ZERO);
    }

    #[test]
    fn test_results_normalized() {
        assert_eq!(ratio_percent(Decimal::from(900), Decimal::from(1000)).to_string(), "90");
        assert_eq!(percent_of(Decimal::new(100_000, 2), Decimal::from(35)).to_string(), "350");
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio_percent(Decimal::from(500), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio_percent(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_ratio_percent() {
        assert_eq!(ratio_percent(Decimal::from(250), Decimal::from(1000)), Decimal::from(25));
        assert_eq!(ratio_percent(Decimal::from(2500), Decimal::from(1000)), Decimal::from(250));
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(progress_percent(Decimal::from(2500), Decimal::from(1000)), Decimal::ONE_HUNDRED);
        assert_eq!(progress_percent(Decimal::from(-5), Decimal::from(1000)), Decimal::ZERO);
        assert_eq!(progress_percent(Decimal::from(400), Decimal::from(1000)), Decimal::from(40));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(Decimal::from(-3)), Decimal::ZERO);
        assert_eq!(non_negative(Decimal::from(3)), Decimal::from(3));
    }
}
