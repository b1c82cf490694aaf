//! Revenue split results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Each party's share of one payment.
///
/// Shares are parallel fractions of the same base amount. `remainder` is
/// only populated for AI-credit purchases, where it holds the affiliate pool.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RevenueSplit {
    #[ts(type = "string")]
    pub admin_profit: Decimal,
    #[ts(type = "string")]
    pub ai_cost: Decimal,
    #[ts(type = "string")]
    pub unilevel: Decimal,
    #[ts(type = "string")]
    pub stairstep: Decimal,
    #[ts(type = "string")]
    pub leadership: Decimal,
    #[ts(type = "string")]
    pub direct_referral: Decimal,
    #[ts(type = "string | null")]
    pub remainder: Option<Decimal>,
}

impl RevenueSplit {
    /// Sum of the six percentage-based shares (remainder excluded).
    ///
    /// Saturates at the `Decimal` range.
    pub fn shares_total(&self) -> Decimal {
        self.admin_profit
            .saturating_add(self.ai_cost)
            .saturating_add(self.unilevel)
            .saturating_add(self.stairstep)
            .saturating_add(self.leadership)
            .saturating_add(self.direct_referral)
    }
}

/// Cost/profit split of an AI-credit purchase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct AiCreditSplit {
    /// Provider cost of the credits.
    #[ts(type = "string")]
    pub ai_cost: Decimal,
    /// Admin safety net before the cost is taken out.
    #[ts(type = "string")]
    pub admin_keeps_total: Decimal,
    /// `max(0, admin_keeps_total - ai_cost)`.
    #[ts(type = "string")]
    pub admin_profit: Decimal,
    /// `max(0, amount - ai_cost - admin_profit)`.
    #[ts(type = "string")]
    pub affiliate_pool: Decimal,
}

/// Outcome of checking that the commission percentages sum to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "delta", rename_all = "snake_case")]
pub enum PercentBalance {
    Balanced,
    /// Percentages sum to less than 100 by the given amount.
    Under(Decimal),
    /// Percentages sum to more than 100 by the given amount.
    Over(Decimal),
}

impl PercentBalance {
    pub fn is_balanced(&self) -> bool {
        matches!(self, PercentBalance::Balanced)
    }
}
