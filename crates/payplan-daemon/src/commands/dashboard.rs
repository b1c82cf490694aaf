//! Dashboard commands.

use std::sync::Arc;

use payplan_revenue::splits;
use serde_json::Value;

use super::compute::load_plan;
use super::{internal, str_param, Result};
use crate::events::now_secs;
use crate::DaemonState;

/// A member's dashboard, served from the read-model.
///
/// Params: `member_id`.
pub async fn get_dashboard(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let member_id = str_param(params, "member_id")?;
    let snapshot = state
        .read_model
        .dashboard(&state.db, member_id, now_secs())
        .await
        .map_err(internal)?;
    serde_json::to_value(&snapshot).map_err(internal)
}

/// Whether the commission percentages add up, plus the parsed plan.
pub async fn get_settings_health(state: &Arc<DaemonState>) -> Result<Value> {
    let plan = load_plan(state).await?;
    let balance = splits::check_balance(&plan.commission);

    Ok(serde_json::json!({
        "total_percent": plan.commission.total_percent(),
        "balanced": balance.is_balanced(),
        "balance": balance,
        "plan": plan,
    }))
}
