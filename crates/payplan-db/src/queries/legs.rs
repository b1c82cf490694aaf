//! Binary leg volume query functions.

use payplan_types::binary::BinaryLegState;
use rusqlite::{Connection, OptionalExtension};

use crate::{parse_decimal, Result};

/// Store the latest leg volumes for a member, replacing any previous row.
pub fn upsert(conn: &Connection, legs: &BinaryLegState) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO leg_volumes (member_id, left_volume, right_volume, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            legs.member_id,
            legs.left_volume.to_string(),
            legs.right_volume.to_string(),
            legs.updated_at as i64,
        ],
    )?;
    Ok(())
}

/// Get a member's leg volumes, or `None` if the backend has not sent any.
pub fn get(conn: &Connection, member_id: &str) -> Result<Option<BinaryLegState>> {
    let raw = conn
        .query_row(
            "SELECT left_volume, right_volume, updated_at FROM leg_volumes WHERE member_id = ?1",
            [member_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    raw.map(|(left, right, updated_at)| {
        Ok(BinaryLegState {
            member_id: member_id.to_string(),
            left_volume: parse_decimal("left_volume", &left)?,
            right_volume: parse_decimal("right_volume", &right)?,
            updated_at: updated_at as u64,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_missing_member() {
        let conn = test_db();
        assert_eq!(get(&conn, "m1").expect("get"), None);
    }

    #[test]
    fn test_upsert_replaces() {
        let conn = test_db();
        let mut legs = BinaryLegState {
            member_id: "m1".to_string(),
            left_volume: Decimal::from(2500),
            right_volume: Decimal::from(1800),
            updated_at: 10,
        };
        upsert(&conn, &legs).expect("insert");
        assert_eq!(get(&conn, "m1").expect("get"), Some(legs.clone()));

        legs.right_volume = Decimal::new(21_005, 1);
        legs.updated_at = 20;
        upsert(&conn, &legs).expect("replace");
        assert_eq!(get(&conn, "m1").expect("get"), Some(legs));
    }
}
