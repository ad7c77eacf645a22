// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::engine::{goals, users};
use tallybook::engine::goals::GoalInput;
use tallybook::error::Error;

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let user = users::create(&conn, "Test User", "test@example.com", "USD").unwrap();
    (conn, user.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn goal_input(name: &str, target: &str) -> GoalInput {
    GoalInput {
        name: name.into(),
        target_amount: dec(target),
        deadline: None,
        icon: String::new(),
    }
}

#[test]
fn contributions_accumulate_and_complete_at_target() {
    let (mut conn, uid) = setup();
    let g = goals::create(&conn, uid, &goal_input("Vacation", "100")).unwrap();
    assert_eq!(g.current_amount, Decimal::ZERO);
    assert!(!g.completed);

    let g = goals::contribute(&mut conn, uid, g.id, dec("60")).unwrap();
    assert!(!g.completed);
    assert_eq!(goals::progress_percentage(&g), dec("60"));

    let g = goals::contribute(&mut conn, uid, g.id, dec("40")).unwrap();
    assert!(g.completed);
    assert_eq!(goals::progress_percentage(&g), dec("100"));
}

#[test]
fn overshooting_contribution_exceeds_one_hundred_percent() {
    let (mut conn, uid) = setup();
    let g = goals::create(&conn, uid, &goal_input("Laptop", "200")).unwrap();
    let g = goals::contribute(&mut conn, uid, g.id, dec("300")).unwrap();
    assert!(g.completed);
    assert_eq!(goals::progress_percentage(&g), dec("150"));
}

#[test]
fn lowering_target_below_current_auto_completes() {
    let (mut conn, uid) = setup();
    let g = goals::create(&conn, uid, &goal_input("Bike", "500")).unwrap();
    let g = goals::contribute(&mut conn, uid, g.id, dec("320")).unwrap();
    assert!(!g.completed);

    let g = goals::update(&conn, uid, g.id, &goal_input("Bike", "300")).unwrap();
    assert!(g.completed);
    assert_eq!(g.current_amount, dec("320"));
}

#[test]
fn raising_target_reopens_a_completed_goal() {
    // completed always mirrors current >= target; a goal whose current
    // falls short of the raised target goes back to active
    let (mut conn, uid) = setup();
    let g = goals::create(&conn, uid, &goal_input("Fund", "100")).unwrap();
    let g = goals::contribute(&mut conn, uid, g.id, dec("100")).unwrap();
    assert!(g.completed);

    let g = goals::update(&conn, uid, g.id, &goal_input("Fund", "200")).unwrap();
    assert!(!g.completed);
}

#[test]
fn non_positive_target_rejected() {
    let (conn, uid) = setup();
    let err = goals::create(&conn, uid, &goal_input("Nope", "0")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn active_listing_excludes_completed() {
    let (mut conn, uid) = setup();
    let a = goals::create(&conn, uid, &goal_input("A", "100")).unwrap();
    goals::create(&conn, uid, &goal_input("B", "100")).unwrap();
    goals::contribute(&mut conn, uid, a.id, dec("100")).unwrap();

    let all = goals::list(&conn, uid).unwrap();
    let active = goals::list_active(&conn, uid).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "B");
}

#[test]
fn goals_are_owner_scoped() {
    let (mut conn, uid) = setup();
    let other = users::create(&conn, "Other", "other@example.com", "USD").unwrap().id;
    let g = goals::create(&conn, uid, &goal_input("Private", "100")).unwrap();

    assert!(matches!(
        goals::get(&conn, other, g.id).unwrap_err(),
        Error::NotFound("goal")
    ));
    assert!(matches!(
        goals::contribute(&mut conn, other, g.id, dec("10")).unwrap_err(),
        Error::NotFound("goal")
    ));
}
