//! Plan settings parsing.
//!
//! The backend hands settings over as a flat `key -> value` string map.
//! Parsing never fails: a missing key takes its default silently and an
//! unparsable value takes its default with a warning.

use std::collections::BTreeMap;
use std::str::FromStr;

use payplan_types::plan::{
    BinaryPlanConfig, CommissionConfig, PlanSettings, DEFAULT_ADMIN_SAFETY_NET,
    DEFAULT_AI_COST_PERCENT, DEFAULT_BINARY_CYCLE_PAYOUT, DEFAULT_BINARY_CYCLE_VOLUME,
    DEFAULT_DAILY_EARNING_CAP, DEFAULT_DIRECT_REFERRAL_PERCENT, DEFAULT_LEADERSHIP_PERCENT,
    DEFAULT_STAIRSTEP_PERCENT, DEFAULT_UNILEVEL_PERCENT, KEY_ADMIN_SAFETY_NET,
    KEY_AI_COST_PERCENT, KEY_BINARY_CYCLE_PAYOUT, KEY_BINARY_CYCLE_VOLUME,
    KEY_DAILY_EARNING_CAP, KEY_DIRECT_REFERRAL_PERCENT, KEY_LEADERSHIP_PERCENT,
    KEY_STAIRSTEP_PERCENT, KEY_UNILEVEL_PERCENT, TIER_PRICE_PREFIX,
};
use rust_decimal::Decimal;

use crate::{Result, RevenueError};

/// Build typed plan settings from the backend's flat settings map.
pub fn parse_plan_settings(raw: &BTreeMap<String, String>) -> PlanSettings {
    let commission = CommissionConfig {
        admin_profit_percent: decimal_or(raw, KEY_ADMIN_SAFETY_NET, DEFAULT_ADMIN_SAFETY_NET),
        ai_cost_percent: decimal_or(raw, KEY_AI_COST_PERCENT, DEFAULT_AI_COST_PERCENT),
        unilevel_percent: decimal_or(raw, KEY_UNILEVEL_PERCENT, DEFAULT_UNILEVEL_PERCENT),
        stairstep_percent: decimal_or(raw, KEY_STAIRSTEP_PERCENT, DEFAULT_STAIRSTEP_PERCENT),
        leadership_percent: decimal_or(raw, KEY_LEADERSHIP_PERCENT, DEFAULT_LEADERSHIP_PERCENT),
        direct_referral_percent: decimal_or(
            raw,
            KEY_DIRECT_REFERRAL_PERCENT,
            DEFAULT_DIRECT_REFERRAL_PERCENT,
        ),
    };

    let binary = BinaryPlanConfig {
        cycle_volume: decimal_or(raw, KEY_BINARY_CYCLE_VOLUME, DEFAULT_BINARY_CYCLE_VOLUME),
        cycle_payout: decimal_or(raw, KEY_BINARY_CYCLE_PAYOUT, DEFAULT_BINARY_CYCLE_PAYOUT),
    };

    let tier_prices = raw
        .iter()
        .filter_map(|(key, value)| {
            let tier = key.strip_prefix(TIER_PRICE_PREFIX)?;
            if tier.is_empty() {
                return None;
            }
            match parse_amount(value) {
                Ok(price) => Some((tier.to_string(), price)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "ignoring unparsable tier price");
                    None
                }
            }
        })
        .collect();

    PlanSettings {
        commission,
        binary,
        daily_cap: decimal_or(raw, KEY_DAILY_EARNING_CAP, DEFAULT_DAILY_EARNING_CAP),
        tier_prices,
    }
}

/// Parse a caller-supplied amount, accepting surrounding whitespace.
///
/// # Errors
///
/// - [`RevenueError::InvalidAmount`] if `input` is not a decimal number
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| RevenueError::InvalidAmount(input.to_string()))
}

fn decimal_or(raw: &BTreeMap<String, String>, key: &str, default: u32) -> Decimal {
    let Some(value) = raw.get(key) else {
        return Decimal::from(default);
    };
    match parse_amount(value) {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(key, value = %value, default, "unparsable setting, using default");
            Decimal::from(default)
        }
    }
}
