//! Revenue split across the compensation plan.
//!
//! Every share is an independent fraction of the same base amount:
//!
//! ```text
//! share = amount * (percent / 100)
//! ```
//!
//! Shares are not deducted sequentially, so they only sum to `amount` when
//! the configured percentages happen to sum to 100. That is never enforced;
//! [`check_balance`] reports the imbalance for display.
//!
//! ## AI-credit purchases
//!
//! AI credits carry a provider cost that comes out of the admin safety net:
//!
//! ```text
//! ai_cost           = amount * ai_cost%
//! admin_keeps_total = amount * admin_profit%
//! admin_profit      = max(0, admin_keeps_total - ai_cost)
//! affiliate_pool    = max(0, amount - ai_cost - admin_profit)
//! ```

use payplan_types::plan::CommissionConfig;
use payplan_types::revenue::{RevenueEvent, RevenueKind, RevenueStatus};
use payplan_types::split::{AiCreditSplit, PercentBalance, RevenueSplit};
use rust_decimal::Decimal;

use crate::ratio::{non_negative, percent_of};
use crate::{Result, RevenueError};

/// Split `amount` into parallel percentage shares. `remainder` is `None`.
pub fn split(amount: Decimal, config: &CommissionConfig) -> RevenueSplit {
    RevenueSplit {
        admin_profit: percent_of(amount, config.admin_profit_percent),
        ai_cost: percent_of(amount, config.ai_cost_percent),
        unilevel: percent_of(amount, config.unilevel_percent),
        stairstep: percent_of(amount, config.stairstep_percent),
        leadership: percent_of(amount, config.leadership_percent),
        direct_referral: percent_of(amount, config.direct_referral_percent),
        remainder: None,
    }
}

/// Cost/profit split of an AI-credit purchase.
pub fn split_ai_credit(amount: Decimal, config: &CommissionConfig) -> AiCreditSplit {
    let ai_cost = percent_of(amount, config.ai_cost_percent);
    let admin_keeps_total = percent_of(amount, config.admin_profit_percent);
    let admin_profit = non_negative(admin_keeps_total.saturating_sub(ai_cost));
    let affiliate_pool = non_negative(amount.saturating_sub(ai_cost).saturating_sub(admin_profit));

    tracing::trace!(
        %amount,
        %ai_cost,
        %admin_profit,
        %affiliate_pool,
        "AI credit split"
    );

    AiCreditSplit {
        ai_cost,
        admin_keeps_total,
        admin_profit,
        affiliate_pool,
    }
}

/// Split a payment according to its kind.
///
/// AI-credit purchases take admin profit and AI cost from
/// [`split_ai_credit`] and report the affiliate pool as `remainder`.
/// Every other kind is a plain [`split`].
pub fn split_kind(amount: Decimal, kind: RevenueKind, config: &CommissionConfig) -> RevenueSplit {
    let mut result = split(amount, config);
    if kind == RevenueKind::AiCreditPurchase {
        let credit = split_ai_credit(amount, config);
        result.admin_profit = credit.admin_profit;
        result.ai_cost = credit.ai_cost;
        result.remainder = Some(credit.affiliate_pool);
    }
    result
}

/// Split a mirrored revenue event according to its kind.
pub fn split_event(event: &RevenueEvent, config: &CommissionConfig) -> RevenueSplit {
    split_kind(event.amount, event.kind, config)
}

/// Sum the splits of every completed event.
///
/// `remainder` is `Some` as soon as one AI-credit purchase contributes.
///
/// # Errors
///
/// - [`RevenueError::Overflow`] if any running total overflows
pub fn split_completed(events: &[RevenueEvent], config: &CommissionConfig) -> Result<RevenueSplit> {
    let mut total = RevenueSplit::default();

    for event in events.iter().filter(|e| e.status == RevenueStatus::Completed) {
        let part = split_event(event, config);
        total.admin_profit = add(total.admin_profit, part.admin_profit)?;
        total.ai_cost = add(total.ai_cost, part.ai_cost)?;
        total.unilevel = add(total.unilevel, part.unilevel)?;
        total.stairstep = add(total.stairstep, part.stairstep)?;
        total.leadership = add(total.leadership, part.leadership)?;
        total.direct_referral = add(total.direct_referral, part.direct_referral)?;
        if let Some(remainder) = part.remainder {
            let running = total.remainder.unwrap_or(Decimal::ZERO);
            total.remainder = Some(add(running, remainder)?);
        }
    }

    Ok(total)
}

/// Compare the configured percentages against 100.
///
/// Logs a warning when they are out of balance but never rejects the
/// configuration.
pub fn check_balance(config: &CommissionConfig) -> PercentBalance {
    let total = config.total_percent();
    let balance = match total.cmp(&Decimal::ONE_HUNDRED) {
        std::cmp::Ordering::Equal => PercentBalance::Balanced,
        std::cmp::Ordering::Less => PercentBalance::Under(Decimal::ONE_HUNDRED.saturating_sub(total)),
        std::cmp::Ordering::Greater => PercentBalance::Over(total.saturating_sub(Decimal::ONE_HUNDRED)),
    };
    if !balance.is_balanced() {
        tracing::warn!(%total, "commission percentages do not sum to 100");
    }
    balance
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or(RevenueError::Overflow)
}
