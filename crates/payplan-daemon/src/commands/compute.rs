//! Calculator commands.
//!
//! These run the pure calculators against the mirrored plan settings. Any
//! input the caller omits comes from the settings; nothing is written.

use std::sync::Arc;

use payplan_db::queries::{earnings, settings};
use payplan_revenue::{caps, cycles, settings as plan_settings, splits};
use payplan_types::cap::DailyEarningCap;
use payplan_types::plan::PlanSettings;
use payplan_types::revenue::RevenueKind;
use payplan_types::{epoch_day, Decimal};
use serde_json::Value;

use super::{decimal_param, internal, optional_decimal_param, Result};
use crate::events::now_secs;
use crate::rpc::RpcError;
use crate::DaemonState;

/// Split an amount with the current commission percentages.
///
/// Params: `amount`, optional `kind` (defaults to `product_sale`).
pub async fn compute_split(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let amount = decimal_param(params, "amount")?;
    let kind = match params.get("kind").and_then(|v| v.as_str()) {
        Some(s) => s
            .parse::<RevenueKind>()
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?,
        None => RevenueKind::ProductSale,
    };

    let plan = load_plan(state).await?;
    let split = splits::split_kind(amount, kind, &plan.commission);
    let credit = (kind == RevenueKind::AiCreditPurchase)
        .then(|| splits::split_ai_credit(amount, &plan.commission));

    Ok(serde_json::json!({
        "kind": kind,
        "split": split,
        "ai_credit": credit,
        "balance": splits::check_balance(&plan.commission),
    }))
}

/// Estimate binary cycle progress.
///
/// Params: `left_volume`, `right_volume`, optional `cycle_volume`.
pub async fn estimate_cycles(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let left = decimal_param(params, "left_volume")?;
    let right = decimal_param(params, "right_volume")?;

    let mut binary = load_plan(state).await?.binary;
    if let Some(cycle_volume) = optional_decimal_param(params, "cycle_volume")? {
        binary.cycle_volume = cycle_volume;
    }

    let estimate = cycles::estimate(left, right, binary.cycle_volume);
    Ok(serde_json::json!({
        "left_percent": estimate.left_percent,
        "right_percent": estimate.right_percent,
        "potential_cycles": estimate.potential_cycles,
        "projected_payout": cycles::projected_payout(&estimate, &binary),
        "volume_to_next_cycle": cycles::volume_to_next_cycle(left, right, binary.cycle_volume),
    }))
}

/// Daily cap progress, and optionally how an incoming payout would split.
///
/// Params: either `member_id` (today's mirrored earnings) or
/// `earned_today`; optional `cap` and `incoming`.
pub async fn get_cap_progress(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let plan = load_plan(state).await?;

    let earned_today = match params.get("member_id").and_then(|v| v.as_str()) {
        Some(member_id) => {
            let db = state.db.lock().await;
            earnings::get(&db, member_id, epoch_day(now_secs())).map_err(internal)?
        }
        None => optional_decimal_param(params, "earned_today")?.unwrap_or(Decimal::ZERO),
    };
    let cap = DailyEarningCap {
        earned_today,
        cap: optional_decimal_param(params, "cap")?.unwrap_or(plan.daily_cap),
    };

    let outcome = optional_decimal_param(params, "incoming")?.map(|incoming| caps::apply(&cap, incoming));

    Ok(serde_json::json!({
        "earned_today": cap.earned_today,
        "cap": cap.cap,
        "progress_percent": caps::progress(&cap),
        "headroom": caps::headroom(&cap),
        "outcome": outcome,
    }))
}

pub(super) async fn load_plan(state: &Arc<DaemonState>) -> Result<PlanSettings> {
    let raw = {
        let db = state.db.lock().await;
        settings::all(&db).map_err(internal)?
    };
    Ok(plan_settings::parse_plan_settings(&raw))
}
