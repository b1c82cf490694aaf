//! Integration test: binary cycles under the daily earning cap.
//!
//! Exercises a member's payout path:
//! 1. Mirror leg volumes and estimate cycles with the stored plan
//! 2. Project the binary payout
//! 3. Apply the daily cap against mirrored earnings
//! 4. Prune expired earnings rows

use payplan_db::queries::{earnings, legs, settings};
use payplan_revenue::{caps, cycles, settings as plan_settings};
use payplan_types::binary::{BinaryLegState, Leg};
use payplan_types::cap::{DailyEarningCap, DailyEarnings};
use payplan_types::epoch_day;
use rust_decimal::Decimal;

const BASE_TIME: u64 = 1_700_000_000;

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn cycles_from_mirrored_legs() {
    let conn = payplan_db::open_memory().expect("open DB");
    legs::upsert(
        &conn,
        &BinaryLegState {
            member_id: "m1".to_string(),
            left_volume: d(2500),
            right_volume: d(1800),
            updated_at: BASE_TIME,
        },
    )
    .expect("legs");

    let plan = plan_settings::parse_plan_settings(&settings::all(&conn).expect("settings"));
    let state = legs::get(&conn, "m1").expect("get").expect("present");
    assert_eq!(state.weaker_leg(), Some(Leg::Right));

    let estimate = cycles::estimate_legs(&state, &plan.binary);
    assert_eq!(estimate.left_percent, Decimal::ONE_HUNDRED);
    assert_eq!(estimate.right_percent, d(100));
    assert_eq!(estimate.potential_cycles, 1);
    assert_eq!(cycles::projected_payout(&estimate, &plan.binary), d(100));
    assert_eq!(
        cycles::volume_to_next_cycle(state.left_volume, state.right_volume, plan.binary.cycle_volume),
        d(200)
    );
}

#[test]
fn zero_cycle_volume_yields_nothing() {
    let conn = payplan_db::open_memory().expect("open DB");
    settings::set(&conn, "binary_cycle_volume", "0").expect("set");

    let plan = plan_settings::parse_plan_settings(&settings::all(&conn).expect("settings"));
    let estimate = cycles::estimate(d(5000), d(5000), plan.binary.cycle_volume);
    assert_eq!(estimate.potential_cycles, 0);
    assert_eq!(cycles::projected_payout(&estimate, &plan.binary), Decimal::ZERO);
}

#[test]
fn payout_is_capped_by_todays_earnings() {
    let conn = payplan_db::open_memory().expect("open DB");
    let today = epoch_day(BASE_TIME);
    earnings::set(
        &conn,
        &DailyEarnings {
            member_id: "m1".to_string(),
            day: today,
            earned: d(900),
        },
    )
    .expect("earnings");

    let plan = plan_settings::parse_plan_settings(&settings::all(&conn).expect("settings"));
    let cap = DailyEarningCap {
        earned_today: earnings::get(&conn, "m1", today).expect("get"),
        cap: plan.daily_cap,
    };

    assert_eq!(caps::progress(&cap), d(90));
    let outcome = caps::apply(&cap, d(300));
    assert_eq!(outcome.credited, d(100));
    assert_eq!(outcome.flushed, d(200));

    // Yesterday's row does not count toward today.
    assert_eq!(earnings::get(&conn, "m1", today + 1).expect("tomorrow"), Decimal::ZERO);
}

#[test]
fn uncapped_plan_credits_everything() {
    let conn = payplan_db::open_memory().expect("open DB");
    settings::set(&conn, "daily_earning_cap", "0").expect("set");

    let plan = plan_settings::parse_plan_settings(&settings::all(&conn).expect("settings"));
    let cap = DailyEarningCap {
        earned_today: d(5000),
        cap: plan.daily_cap,
    };
    assert_eq!(caps::progress(&cap), Decimal::ZERO);
    assert_eq!(caps::headroom(&cap), None);
    assert_eq!(caps::apply(&cap, d(750)).credited, d(750));
}

#[test]
fn expired_earnings_are_pruned() {
    let conn = payplan_db::open_memory().expect("open DB");
    let today = epoch_day(BASE_TIME);
    for (member, day) in [("m1", today - 40), ("m1", today), ("m2", today - 36)] {
        earnings::set(
            &conn,
            &DailyEarnings {
                member_id: member.to_string(),
                day,
                earned: d(10),
            },
        )
        .expect("earnings");
    }

    assert_eq!(earnings::prune_before(&conn, today - 35).expect("prune"), 2);
    assert_eq!(earnings::get(&conn, "m1", today).expect("kept"), d(10));
}
