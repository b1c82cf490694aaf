//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are forward-only;
//! the mirror can always be rebuilt from the backend.

use payplan_types::plan::{
    DEFAULT_ADMIN_SAFETY_NET, DEFAULT_AI_COST_PERCENT, DEFAULT_BINARY_CYCLE_PAYOUT,
    DEFAULT_BINARY_CYCLE_VOLUME, DEFAULT_DAILY_EARNING_CAP, DEFAULT_DIRECT_REFERRAL_PERCENT,
    DEFAULT_LEADERSHIP_PERCENT, DEFAULT_STAIRSTEP_PERCENT, DEFAULT_UNILEVEL_PERCENT,
    KEY_ADMIN_SAFETY_NET, KEY_AI_COST_PERCENT, KEY_BINARY_CYCLE_PAYOUT, KEY_BINARY_CYCLE_VOLUME,
    KEY_DAILY_EARNING_CAP, KEY_DIRECT_REFERRAL_PERCENT, KEY_LEADERSHIP_PERCENT,
    KEY_STAIRSTEP_PERCENT, KEY_UNILEVEL_PERCENT,
};
use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    if current_version == 0 {
        // Fresh database, apply initial schema
        tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
        conn.execute_batch(schema::SCHEMA_V1)
            .map_err(DbError::Sqlite)?;

        insert_default_settings(conn)?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DbError::Sqlite)?;
    } else if current_version < SCHEMA_VERSION {
        for version in (current_version + 1)..=SCHEMA_VERSION {
            tracing::info!("Running migration to v{version}");
            run_migration(conn, version)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(DbError::Sqlite)?;
        }
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

/// Seed the plan defaults so a fresh mirror computes sensible figures
/// before the first settings sync.
fn insert_default_settings(conn: &Connection) -> Result<()> {
    let defaults = [
        (KEY_ADMIN_SAFETY_NET, DEFAULT_ADMIN_SAFETY_NET),
        (KEY_AI_COST_PERCENT, DEFAULT_AI_COST_PERCENT),
        (KEY_UNILEVEL_PERCENT, DEFAULT_UNILEVEL_PERCENT),
        (KEY_STAIRSTEP_PERCENT, DEFAULT_STAIRSTEP_PERCENT),
        (KEY_LEADERSHIP_PERCENT, DEFAULT_LEADERSHIP_PERCENT),
        (KEY_DIRECT_REFERRAL_PERCENT, DEFAULT_DIRECT_REFERRAL_PERCENT),
        (KEY_BINARY_CYCLE_VOLUME, DEFAULT_BINARY_CYCLE_VOLUME),
        (KEY_BINARY_CYCLE_PAYOUT, DEFAULT_BINARY_CYCLE_PAYOUT),
        (KEY_DAILY_EARNING_CAP, DEFAULT_DAILY_EARNING_CAP),
    ];

    let mut stmt = conn
        .prepare("INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)")
        .map_err(DbError::Sqlite)?;

    for (key, value) in &defaults {
        stmt.execute(rusqlite::params![key, value.to_string()])
            .map_err(DbError::Sqlite)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(_conn: &Connection, version: u32) -> Result<()> {
    Err(DbError::Migration(format!(
        "Unknown migration version: {version}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerun_is_noop() {
        let conn = crate::open_memory().expect("open");
        run(&conn).expect("second run");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 9);
    }

    #[test]
    fn test_newer_version_rejected() {
        let conn = crate::open_memory().expect("open");
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .expect("bump version");
        assert!(matches!(run(&conn), Err(DbError::Migration(_))));
    }
}
