//! Settings query functions.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::{DbError, Result};

/// Get a setting value by key.
pub fn get(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            DbError::NotFound(format!("setting '{key}'"))
        }
        other => DbError::Sqlite(other),
    })
}

/// Set a setting value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// Replace several settings atomically. Returns the number of keys written.
pub fn set_many(conn: &Connection, values: &BTreeMap<String, String>) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare("INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)")?;
        for (key, value) in values {
            stmt.execute(rusqlite::params![key, value])?;
        }
    }
    tx.commit()?;
    tracing::debug!(count = values.len(), "settings updated");
    Ok(values.len())
}

/// Every setting as the flat map the plan parser consumes.
pub fn all(conn: &Connection) -> Result<BTreeMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_get_default_setting() {
        let conn = test_db();
        let net = get(&conn, "admin_safety_net").expect("get");
        assert_eq!(net, "35");
    }

    #[test]
    fn test_set_and_get() {
        let conn = test_db();
        set(&conn, "admin_safety_net", "40").expect("set");
        assert_eq!(get(&conn, "admin_safety_net").expect("get"), "40");
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = test_db();
        let result = get(&conn, "nonexistent");
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_set_many_and_all() {
        let conn = test_db();
        let mut values = BTreeMap::new();
        values.insert("unilevel_percent".to_string(), "22.5".to_string());
        values.insert("tier_price.gold".to_string(), "99".to_string());
        assert_eq!(set_many(&conn, &values).expect("set_many"), 2);

        let all = all(&conn).expect("all");
        assert_eq!(all.get("unilevel_percent").map(String::as_str), Some("22.5"));
        assert_eq!(all.get("tier_price.gold").map(String::as_str), Some("99"));
        assert_eq!(all.get("admin_safety_net").map(String::as_str), Some("35"));
    }
}
