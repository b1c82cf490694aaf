//! Dashboard read-model.
//!
//! Snapshots are computed on demand from the store and cached per member.
//! A change event drops the affected entries; the next read recomputes
//! them. Nothing here writes to the store.
//!
//! Every invalidation bumps a generation counter. A snapshot computed
//! across an invalidation is returned to its caller but never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use payplan_db::queries::{earnings, legs, revenue, settings};
use payplan_revenue::{caps, cycles, ratio, settings as plan_settings, splits};
use payplan_types::binary::BinaryLegState;
use payplan_types::cap::DailyEarningCap;
use payplan_types::dashboard::{DashboardSnapshot, SalesLine};
use payplan_types::events::Event;
use payplan_types::revenue::RevenueStatus;
use payplan_types::{epoch_day, Decimal};
use rusqlite::Connection;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::events::{is_member_scoped, EventBus};

/// Compute a member's dashboard from the current store contents.
pub fn compute_snapshot(
    conn: &Connection,
    member_id: &str,
    now: u64,
) -> anyhow::Result<DashboardSnapshot> {
    let plan = plan_settings::parse_plan_settings(&settings::all(conn)?);

    let totals = revenue::totals_by_kind(conn, RevenueStatus::Completed)?;
    let total_sales = totals
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| anyhow::anyhow!("total sales overflow"))?;
    let sales = totals
        .into_iter()
        .map(|(kind, total)| SalesLine {
            kind,
            total,
            share_percent: ratio::ratio_percent(total, total_sales),
        })
        .collect();

    let completed = revenue::list_by_status(conn, RevenueStatus::Completed)?;
    let revenue_split = splits::split_completed(&completed, &plan.commission)?;

    let leg_state = legs::get(conn, member_id)?.unwrap_or_else(|| BinaryLegState {
        member_id: member_id.to_string(),
        left_volume: Decimal::ZERO,
        right_volume: Decimal::ZERO,
        updated_at: 0,
    });
    let cycle_estimate = cycles::estimate_legs(&leg_state, &plan.binary);
    let projected_binary_payout = cycles::projected_payout(&cycle_estimate, &plan.binary);

    let cap = DailyEarningCap {
        earned_today: earnings::get(conn, member_id, epoch_day(now))?,
        cap: plan.daily_cap,
    };

    Ok(DashboardSnapshot {
        member_id: member_id.to_string(),
        sales,
        total_sales,
        revenue_split,
        cycles: cycle_estimate,
        projected_binary_payout,
        binary_after_cap: caps::apply(&cap, projected_binary_payout),
        earned_today: cap.earned_today,
        cap_progress_percent: caps::progress(&cap),
        percentages_balanced: splits::check_balance(&plan.commission).is_balanced(),
        computed_at: now,
    })
}

/// Per-member snapshot cache, invalidated by change events.
#[derive(Default)]
pub struct ReadModel {
    snapshots: RwLock<HashMap<String, DashboardSnapshot>>,
    /// Bumped under the `snapshots` write lock on every invalidation.
    generation: AtomicU64,
    recomputes: AtomicU64,
}

impl ReadModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, recomputing it if it was invalidated.
    pub async fn dashboard(
        &self,
        db: &Mutex<Connection>,
        member_id: &str,
        now: u64,
    ) -> anyhow::Result<DashboardSnapshot> {
        if let Some(hit) = self.snapshots.read().await.get(member_id) {
            return Ok(hit.clone());
        }

        let generation = self.generation();
        let snapshot = {
            let conn = db.lock().await;
            compute_snapshot(&conn, member_id, now)?
        };
        self.recomputes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(member = member_id, generation, "dashboard recomputed");

        self.store(member_id, snapshot.clone(), generation).await;
        Ok(snapshot)
    }

    /// Cache `snapshot` unless an invalidation happened since `generation`
    /// was read. Returns whether it was cached.
    async fn store(&self, member_id: &str, snapshot: DashboardSnapshot, generation: u64) -> bool {
        let mut snapshots = self.snapshots.write().await;
        if self.generation() != generation {
            tracing::debug!(member = member_id, "store changed during recompute, not caching");
            return false;
        }
        snapshots.insert(member_id.to_string(), snapshot);
        true
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Drop the cache entries an event makes stale.
    pub async fn invalidate(&self, event: &Event) {
        let mut snapshots = self.snapshots.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        match event.member_id.as_deref() {
            Some(member) if is_member_scoped(event) => {
                snapshots.remove(member);
            }
            _ => snapshots.clear(),
        }
    }

    /// Drop every cached snapshot.
    pub async fn invalidate_all(&self) {
        let mut snapshots = self.snapshots.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        snapshots.clear();
    }

    /// Number of cached snapshots.
    pub async fn cached(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// How many times a snapshot has been computed.
    pub fn recomputes(&self) -> u64 {
        self.recomputes.load(Ordering::Relaxed)
    }

    /// Invalidate on every event published on `bus` until shutdown.
    pub fn spawn_listener(
        self: Arc<Self>,
        bus: &EventBus,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Ok(event) => self.invalidate(&event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "read-model listener lagged, dropping cache");
                            self.invalidate_all().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = shutdown.recv() => break,
                }
            }
            tracing::debug!("read-model listener stopped");
        })
    }
}
