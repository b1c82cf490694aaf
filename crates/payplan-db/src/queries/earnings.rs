//! Daily earnings query functions.

use payplan_types::cap::DailyEarnings;
use payplan_types::EpochDay;
use rust_decimal::Decimal;
use rusqlite::{Connection, OptionalExtension};

use crate::{parse_decimal, Result};

/// Store a member's earnings total for a day, as reported by the backend.
pub fn set(conn: &Connection, earnings: &DailyEarnings) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO daily_earnings (member_id, day, earned) VALUES (?1, ?2, ?3)",
        rusqlite::params![earnings.member_id, earnings.day as i64, earnings.earned.to_string()],
    )?;
    Ok(())
}

/// A member's earnings for a day; zero when nothing was recorded.
pub fn get(conn: &Connection, member_id: &str, day: EpochDay) -> Result<Decimal> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT earned FROM daily_earnings WHERE member_id = ?1 AND day = ?2",
            rusqlite::params![member_id, day as i64],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(value) => parse_decimal("earned", &value),
        None => Ok(Decimal::ZERO),
    }
}

/// Drop rows older than `keep_from`. Returns the number of rows removed.
pub fn prune_before(conn: &Connection, keep_from: EpochDay) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM daily_earnings WHERE day < ?1",
        [keep_from as i64],
    )?;
    if removed > 0 {
        tracing::debug!(removed, keep_from, "pruned old daily earnings");
    }
    Ok(removed)
}
