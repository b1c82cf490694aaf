//! Revenue event query functions.

use std::collections::BTreeMap;

use payplan_types::revenue::{RevenueEvent, RevenueKind, RevenueStatus};
use rust_decimal::Decimal;
use rusqlite::Connection;

use crate::{parse_decimal, DbError, Result};

/// Insert a revenue event, or update the status of one already mirrored.
///
/// Amount, kind and timestamp of an existing row are never changed.
/// Returns `true` if a row was inserted or its status changed.
pub fn upsert(conn: &Connection, event: &RevenueEvent) -> Result<bool> {
    let changed = conn.execute(
        "INSERT INTO revenue_events (event_ref, kind, amount, status, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(event_ref) DO UPDATE SET status = excluded.status
         WHERE revenue_events.status != excluded.status",
        rusqlite::params![
            event.event_ref,
            event.kind.as_str(),
            event.amount.to_string(),
            event.status.as_str(),
            event.recorded_at as i64,
        ],
    )?;
    Ok(changed > 0)
}

/// Get a single event by its backend id.
pub fn get(conn: &Connection, event_ref: &str) -> Result<RevenueEvent> {
    let raw = conn
        .query_row(
            "SELECT event_ref, kind, amount, status, recorded_at
             FROM revenue_events WHERE event_ref = ?1",
            [event_ref],
            raw_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("revenue event '{event_ref}'"))
            }
            other => DbError::Sqlite(other),
        })?;
    decode(raw)
}

/// All events with the given status, oldest first.
pub fn list_by_status(conn: &Connection, status: RevenueStatus) -> Result<Vec<RevenueEvent>> {
    let mut stmt = conn.prepare(
        "SELECT event_ref, kind, amount, status, recorded_at
         FROM revenue_events WHERE status = ?1 ORDER BY recorded_at ASC, event_ref ASC",
    )?;
    let rows = stmt
        .query_map([status.as_str()], raw_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(decode).collect()
}

/// Sum of amounts per kind for events with the given status.
///
/// Every kind is present in the result, zero when it has no events.
pub fn totals_by_kind(
    conn: &Connection,
    status: RevenueStatus,
) -> Result<BTreeMap<RevenueKind, Decimal>> {
    let mut totals: BTreeMap<RevenueKind, Decimal> = RevenueKind::ALL
        .iter()
        .map(|kind| (*kind, Decimal::ZERO))
        .collect();

    for event in list_by_status(conn, status)? {
        let entry = totals.entry(event.kind).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(event.amount)
            .ok_or_else(|| DbError::Serialization("revenue total overflow".into()))?;
    }

    Ok(totals)
}

/// Sum of amounts across every kind for the given status.
pub fn total(conn: &Connection, status: RevenueStatus) -> Result<Decimal> {
    totals_by_kind(conn, status)?
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| DbError::Serialization("revenue total overflow".into()))
}

type RawRow = (String, String, String, String, i64);

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode((event_ref, kind, amount, status, recorded_at): RawRow) -> Result<RevenueEvent> {
    Ok(RevenueEvent {
        kind: kind
            .parse()
            .map_err(|e: payplan_types::revenue::ParseEnumError| DbError::Serialization(e.to_string()))?,
        status: status
            .parse()
            .map_err(|e: payplan_types::revenue::ParseEnumError| DbError::Serialization(e.to_string()))?,
        amount: parse_decimal("amount", &amount)?,
        recorded_at: recorded_at as u64,
        event_ref,
    })
}
