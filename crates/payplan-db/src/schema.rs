//! SQL schema definitions.
//!
//! Money columns are TEXT holding a canonical decimal string so that no
//! precision is lost to SQLite's REAL affinity.

/// Complete schema for the v1 read-model database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Plan settings (flat key/value, mirrored from the backend)
-- ============================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- ============================================================
-- Revenue events
-- ============================================================

CREATE TABLE IF NOT EXISTS revenue_events (
    event_ref TEXT PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('subscription', 'topup', 'product_sale', 'ai_credit_purchase')),
    amount TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('pending', 'completed', 'refunded')),
    recorded_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_revenue_status_kind ON revenue_events(status, kind);

-- ============================================================
-- Binary leg volumes
-- ============================================================

CREATE TABLE IF NOT EXISTS leg_volumes (
    member_id TEXT PRIMARY KEY,
    left_volume TEXT NOT NULL,
    right_volume TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

-- ============================================================
-- Daily earnings (cap tracking)
-- ============================================================

CREATE TABLE IF NOT EXISTS daily_earnings (
    member_id TEXT NOT NULL,
    day INTEGER NOT NULL,
    earned TEXT NOT NULL,
    PRIMARY KEY (member_id, day)
);
"#;
