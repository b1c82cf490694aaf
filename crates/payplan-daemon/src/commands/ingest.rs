//! Mirror update handlers.
//!
//! The backend's change feed pushes rows through these commands. Each one
//! writes the store, drops the stale read-model entries and announces the
//! change on the event bus.

use std::collections::BTreeMap;
use std::sync::Arc;

use payplan_db::queries::{earnings, legs, revenue, settings};
use payplan_types::binary::BinaryLegState;
use payplan_types::cap::DailyEarnings;
use payplan_types::epoch_day;
use payplan_types::events::{Event, EventType};
use payplan_types::revenue::{RevenueEvent, RevenueKind, RevenueStatus};
use serde_json::Value;

use super::{decimal_param, internal, str_param, Result};
use crate::events::now_secs;
use crate::rpc::RpcError;
use crate::DaemonState;

/// Replace plan settings. Values may be strings or numbers.
pub async fn ingest_settings(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let entries = params
        .get("settings")
        .and_then(|v| v.as_object())
        .ok_or_else(|| RpcError::invalid_params("settings object required"))?;

    let mut values = BTreeMap::new();
    for (key, value) in entries {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(RpcError::invalid_params(&format!(
                    "setting {key} must be a string or number"
                )))
            }
        };
        values.insert(key.clone(), text);
    }

    let written = {
        let db = state.db.lock().await;
        settings::set_many(&db, &values).map_err(internal)?
    };

    publish(state, Event::global(EventType::SettingsChanged, now_secs())).await;
    tracing::info!(written, "plan settings ingested");

    Ok(serde_json::json!({ "written": written }))
}

/// Record a revenue event, or update the status of one already mirrored.
pub async fn ingest_revenue_event(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let event = RevenueEvent {
        event_ref: str_param(params, "event_ref")?.to_string(),
        amount: decimal_param(params, "amount")?,
        kind: str_param(params, "kind")?
            .parse::<RevenueKind>()
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?,
        status: match params.get("status").and_then(|v| v.as_str()) {
            Some(s) => s
                .parse::<RevenueStatus>()
                .map_err(|e| RpcError::invalid_params(&e.to_string()))?,
            None => RevenueStatus::Completed,
        },
        recorded_at: params
            .get("recorded_at")
            .and_then(|v| v.as_u64())
            .unwrap_or_else(now_secs),
    };

    let changed = {
        let db = state.db.lock().await;
        revenue::upsert(&db, &event).map_err(internal)?
    };

    if changed {
        publish(state, Event::global(EventType::RevenueRecorded, now_secs())).await;
        tracing::debug!(
            event_ref = %event.event_ref,
            kind = %event.kind,
            status = %event.status,
            amount = %event.amount,
            "revenue event ingested"
        );
    }

    Ok(serde_json::json!({ "changed": changed }))
}

/// Store a member's latest leg volumes.
pub async fn ingest_leg_volumes(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let leg_state = BinaryLegState {
        member_id: str_param(params, "member_id")?.to_string(),
        left_volume: decimal_param(params, "left_volume")?,
        right_volume: decimal_param(params, "right_volume")?,
        updated_at: params
            .get("updated_at")
            .and_then(|v| v.as_u64())
            .unwrap_or_else(now_secs),
    };

    {
        let db = state.db.lock().await;
        legs::upsert(&db, &leg_state).map_err(internal)?;
    }

    publish(
        state,
        Event::for_member(EventType::LegVolumesChanged, now_secs(), leg_state.member_id.clone()),
    )
    .await;

    Ok(serde_json::json!({ "member_id": leg_state.member_id }))
}

/// Store a member's earnings total for a day.
///
/// `day` defaults to the UTC day of `timestamp`, or today.
pub async fn ingest_daily_earnings(state: &Arc<DaemonState>, params: &Value) -> Result<Value> {
    let day = match params.get("day").and_then(|v| v.as_u64()) {
        Some(day) => day,
        None => epoch_day(
            params
                .get("timestamp")
                .and_then(|v| v.as_u64())
                .unwrap_or_else(now_secs),
        ),
    };
    let row = DailyEarnings {
        member_id: str_param(params, "member_id")?.to_string(),
        day,
        earned: decimal_param(params, "earned")?,
    };

    {
        let db = state.db.lock().await;
        earnings::set(&db, &row).map_err(internal)?;
    }

    publish(
        state,
        Event::for_member(EventType::EarningsChanged, now_secs(), row.member_id.clone()),
    )
    .await;

    Ok(serde_json::json!({ "member_id": row.member_id, "day": row.day }))
}

/// Drop stale snapshots before replying, then tell other subscribers.
async fn publish(state: &Arc<DaemonState>, event: Event) {
    state.read_model.invalidate(&event).await;
    state.event_bus.emit(event);
}
