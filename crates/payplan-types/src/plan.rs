//! Compensation plan configuration.
//!
//! The backend stores plan settings as a flat mapping of string keys to
//! string values. The keys and fallback defaults live here so that the
//! parser, the store and the service agree on them.
//!
//! Default commission split (sums to 100):
//!
//! - **Admin safety net**: 35%
//! - **AI / service cost**: 20%
//! - **Unilevel**: 20%
//! - **Stair-step**: 10%
//! - **Leadership**: 5%
//! - **Direct referral**: 10%

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settings key for the admin profit percentage.
pub const KEY_ADMIN_SAFETY_NET: &str = "admin_safety_net";
/// Settings key for the AI / service cost percentage.
pub const KEY_AI_COST_PERCENT: &str = "ai_cost_percent";
/// Settings key for the unilevel pool percentage.
pub const KEY_UNILEVEL_PERCENT: &str = "unilevel_percent";
/// Settings key for the stair-step pool percentage.
pub const KEY_STAIRSTEP_PERCENT: &str = "stairstep_percent";
/// Settings key for the leadership pool percentage.
pub const KEY_LEADERSHIP_PERCENT: &str = "leadership_percent";
/// Settings key for the direct referral percentage.
pub const KEY_DIRECT_REFERRAL_PERCENT: &str = "direct_referral_percent";
/// Settings key for the volume each leg needs per binary cycle.
pub const KEY_BINARY_CYCLE_VOLUME: &str = "binary_cycle_volume";
/// Settings key for the fixed payout of one binary cycle.
pub const KEY_BINARY_CYCLE_PAYOUT: &str = "binary_cycle_payout";
/// Settings key for the per-member daily earning cap.
pub const KEY_DAILY_EARNING_CAP: &str = "daily_earning_cap";
/// Prefix of subscription tier price keys, e.g. `tier_price.gold`.
pub const TIER_PRICE_PREFIX: &str = "tier_price.";

pub const DEFAULT_ADMIN_SAFETY_NET: u32 = 35;
pub const DEFAULT_AI_COST_PERCENT: u32 = 20;
pub const DEFAULT_UNILEVEL_PERCENT: u32 = 20;
pub const DEFAULT_STAIRSTEP_PERCENT: u32 = 10;
pub const DEFAULT_LEADERSHIP_PERCENT: u32 = 5;
pub const DEFAULT_DIRECT_REFERRAL_PERCENT: u32 = 10;
pub const DEFAULT_BINARY_CYCLE_VOLUME: u32 = 1_000;
pub const DEFAULT_BINARY_CYCLE_PAYOUT: u32 = 100;
pub const DEFAULT_DAILY_EARNING_CAP: u32 = 1_000;

/// Named commission percentages. Each is a free-floating value; nothing
/// enforces that they sum to 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub admin_profit_percent: Decimal,
    pub ai_cost_percent: Decimal,
    pub unilevel_percent: Decimal,
    pub stairstep_percent: Decimal,
    pub leadership_percent: Decimal,
    pub direct_referral_percent: Decimal,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            admin_profit_percent: Decimal::from(DEFAULT_ADMIN_SAFETY_NET),
            ai_cost_percent: Decimal::from(DEFAULT_AI_COST_PERCENT),
            unilevel_percent: Decimal::from(DEFAULT_UNILEVEL_PERCENT),
            stairstep_percent: Decimal::from(DEFAULT_STAIRSTEP_PERCENT),
            leadership_percent: Decimal::from(DEFAULT_LEADERSHIP_PERCENT),
            direct_referral_percent: Decimal::from(DEFAULT_DIRECT_REFERRAL_PERCENT),
        }
    }
}

impl CommissionConfig {
    /// Sum of every configured percentage, saturating at the `Decimal` range.
    pub fn total_percent(&self) -> Decimal {
        self.admin_profit_percent
            .saturating_add(self.ai_cost_percent)
            .saturating_add(self.unilevel_percent)
            .saturating_add(self.stairstep_percent)
            .saturating_add(self.leadership_percent)
            .saturating_add(self.direct_referral_percent)
    }
}

/// Binary plan parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryPlanConfig {
    /// Volume required on each leg to complete one cycle.
    pub cycle_volume: Decimal,
    /// Fixed commission paid per completed cycle.
    pub cycle_payout: Decimal,
}

impl Default for BinaryPlanConfig {
    fn default() -> Self {
        Self {
            cycle_volume: Decimal::from(DEFAULT_BINARY_CYCLE_VOLUME),
            cycle_payout: Decimal::from(DEFAULT_BINARY_CYCLE_PAYOUT),
        }
    }
}

/// Every plan setting the calculators consume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub commission: CommissionConfig,
    pub binary: BinaryPlanConfig,
    /// Per-member daily earning cap. Zero or less disables the cap.
    pub daily_cap: Decimal,
    /// Subscription tier prices keyed by tier name.
    pub tier_prices: BTreeMap<String, Decimal>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            commission: CommissionConfig::default(),
            binary: BinaryPlanConfig::default(),
            daily_cap: Decimal::from(DEFAULT_DAILY_EARNING_CAP),
            tier_prices: BTreeMap::new(),
        }
    }
}

impl PlanSettings {
    /// Price of a subscription tier, if configured.
    pub fn tier_price(&self, tier: &str) -> Option<Decimal> {
        self.tier_prices.get(tier).copied()
    }
}
