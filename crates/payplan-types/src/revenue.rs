//! Revenue events mirrored from the backend.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EventRef;

/// What kind of payment produced a revenue event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RevenueKind {
    Subscription,
    Topup,
    ProductSale,
    AiCreditPurchase,
}

/// Settlement status of a mirrored revenue event.
///
/// Only [`RevenueStatus::Completed`] events count towards sales totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RevenueStatus {
    Pending,
    Completed,
    Refunded,
}

/// Error returned when a stored kind or status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field}: {value:?}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub field: &'static str,
    /// The offending input.
    pub value: String,
}

impl RevenueKind {
    /// Every kind, in display order.
    pub const ALL: [RevenueKind; 4] = [
        RevenueKind::Subscription,
        RevenueKind::Topup,
        RevenueKind::ProductSale,
        RevenueKind::AiCreditPurchase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueKind::Subscription => "subscription",
            RevenueKind::Topup => "topup",
            RevenueKind::ProductSale => "product_sale",
            RevenueKind::AiCreditPurchase => "ai_credit_purchase",
        }
    }
}

impl fmt::Display for RevenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevenueKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscription" => Ok(RevenueKind::Subscription),
            "topup" => Ok(RevenueKind::Topup),
            "product_sale" => Ok(RevenueKind::ProductSale),
            "ai_credit_purchase" => Ok(RevenueKind::AiCreditPurchase),
            other => Err(ParseEnumError {
                field: "revenue kind",
                value: other.to_string(),
            }),
        }
    }
}

impl RevenueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueStatus::Pending => "pending",
            RevenueStatus::Completed => "completed",
            RevenueStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for RevenueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevenueStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RevenueStatus::Pending),
            "completed" => Ok(RevenueStatus::Completed),
            "refunded" => Ok(RevenueStatus::Refunded),
            other => Err(ParseEnumError {
                field: "revenue status",
                value: other.to_string(),
            }),
        }
    }
}

/// A single payment as recorded by the backend. Immutable once recorded;
/// a later row with the same `event_ref` only updates its status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RevenueEvent {
    /// Backend row id.
    pub event_ref: EventRef,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub kind: RevenueKind,
    pub status: RevenueStatus,
    /// Unix timestamp in seconds.
    pub recorded_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip() {
        for kind in RevenueKind::ALL {
            let parsed: RevenueKind = kind.as_str().parse().expect("parse kind");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "donation".parse::<RevenueKind>().expect_err("unknown kind");
        assert_eq!(err.field, "revenue kind");
        assert_eq!(err.value, "donation");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("completed".parse::<RevenueStatus>(), Ok(RevenueStatus::Completed));
        assert!("settled".parse::<RevenueStatus>().is_err());
    }

    #[test]
    fn test_event_serializes_amount_as_string() {
        let event = RevenueEvent {
            event_ref: "pay_1".to_string(),
            amount: Decimal::new(12_550, 2),
            kind: RevenueKind::AiCreditPurchase,
            status: RevenueStatus::Completed,
            recorded_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["amount"], "125.50");
        assert_eq!(json["kind"], "ai_credit_purchase");
    }
}
