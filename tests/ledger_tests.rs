// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::engine::{accounts, categories, transactions, users};
use tallybook::engine::accounts::AccountInput;
use tallybook::engine::categories::CategoryInput;
use tallybook::engine::transactions::TransactionInput;
use tallybook::error::Error;
use tallybook::models::{AccountKind, Flow};

fn setup() -> (Connection, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::seed_default_categories(&conn).unwrap();
    let user = users::create(&conn, "Test User", "test@example.com", "USD").unwrap();
    (conn, user.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn account(conn: &Connection, user_id: i64, name: &str, balance: &str) -> i64 {
    accounts::create(
        conn,
        user_id,
        &AccountInput {
            name: name.into(),
            kind: AccountKind::Checking,
            balance: dec(balance),
            credit_limit: None,
        },
    )
    .unwrap()
    .id
}

fn category(conn: &Connection, user_id: i64, name: &str, flow: Flow) -> i64 {
    categories::create(
        conn,
        user_id,
        &CategoryInput {
            name: name.into(),
            flow,
            icon: String::new(),
            color: String::new(),
        },
    )
    .unwrap()
    .id
}

fn tx_input(account_id: i64, category_id: i64, flow: Flow, amount: &str) -> TransactionInput {
    TransactionInput {
        account_id,
        category_id,
        flow,
        amount: dec(amount),
        description: "test".into(),
        date: date("2025-06-15"),
        receipt_url: None,
        is_recurring: false,
    }
}

fn balance_of(conn: &Connection, user_id: i64, account_id: i64) -> Decimal {
    accounts::get(conn, user_id, account_id).unwrap().balance
}

#[test]
fn create_applies_signed_effect() {
    let (mut conn, uid) = setup();
    let acct = account(&conn, uid, "Checking", "0");
    let income = category(&conn, uid, "Salary+", Flow::Income);
    let expense = category(&conn, uid, "Dining+", Flow::Expense);

    transactions::create(&mut conn, uid, &tx_input(acct, income, Flow::Income, "250")).unwrap();
    assert_eq!(balance_of(&conn, uid, acct), dec("250"));

    transactions::create(&mut conn, uid, &tx_input(acct, expense, Flow::Expense, "75.50")).unwrap();
    assert_eq!(balance_of(&conn, uid, acct), dec("174.50"));
}

#[test]
fn update_reconciles_across_accounts() {
    let (mut conn, uid) = setup();
    // A starts at 100 so it sits at 0 once the expense lands
    let a = account(&conn, uid, "A", "100");
    let b = account(&conn, uid, "B", "0");
    let expense = category(&conn, uid, "Dining", Flow::Expense);
    let income = category(&conn, uid, "Salary", Flow::Income);

    let t = transactions::create(&mut conn, uid, &tx_input(a, expense, Flow::Expense, "100")).unwrap();
    assert_eq!(balance_of(&conn, uid, a), dec("0"));

    transactions::update(&mut conn, uid, t.id, &tx_input(b, income, Flow::Income, "40")).unwrap();
    assert_eq!(balance_of(&conn, uid, a), dec("100"));
    assert_eq!(balance_of(&conn, uid, b), dec("40"));
}

#[test]
fn delete_reverts_effect() {
    let (mut conn, uid) = setup();
    let acct = account(&conn, uid, "Checking", "0");
    let income = category(&conn, uid, "Salary", Flow::Income);

    let t = transactions::create(&mut conn, uid, &tx_input(acct, income, Flow::Income, "50")).unwrap();
    assert_eq!(balance_of(&conn, uid, acct), dec("50"));

    transactions::delete(&mut conn, uid, t.id).unwrap();
    assert_eq!(balance_of(&conn, uid, acct), dec("0"));
}

#[test]
fn balance_equals_sum_of_live_effects_after_mixed_mutations() {
    let (mut conn, uid) = setup();
    let acct = account(&conn, uid, "Checking", "0");
    let income = category(&conn, uid, "Salary", Flow::Income);
    let expense = category(&conn, uid, "Dining", Flow::Expense);

    let t1 = transactions::create(&mut conn, uid, &tx_input(acct, income, Flow::Income, "1000")).unwrap();
    let t2 = transactions::create(&mut conn, uid, &tx_input(acct, expense, Flow::Expense, "120")).unwrap();
    transactions::create(&mut conn, uid, &tx_input(acct, expense, Flow::Expense, "30.25")).unwrap();
    transactions::update(&mut conn, uid, t2.id, &tx_input(acct, expense, Flow::Expense, "200")).unwrap();
    transactions::delete(&mut conn, uid, t1.id).unwrap();

    let mut derived = Decimal::ZERO;
    for t in transactions::list(&conn, uid, None).unwrap() {
        match t.flow {
            Flow::Income => derived += t.amount,
            Flow::Expense => derived -= t.amount,
        }
    }
    assert_eq!(balance_of(&conn, uid, acct), derived);
    assert_eq!(derived, dec("-230.25"));
}

#[test]
fn flow_mismatch_rejected_without_ledger_mutation() {
    let (mut conn, uid) = setup();
    let acct = account(&conn, uid, "Checking", "10");
    let expense = category(&conn, uid, "Dining", Flow::Expense);

    let err = transactions::create(&mut conn, uid, &tx_input(acct, expense, Flow::Income, "100"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert_eq!(balance_of(&conn, uid, acct), dec("10"));
    assert!(transactions::list(&conn, uid, None).unwrap().is_empty());
}

#[test]
fn failed_update_leaves_ledger_untouched() {
    let (mut conn, uid) = setup();
    let acct = account(&conn, uid, "Checking", "0");
    let expense = category(&conn, uid, "Dining", Flow::Expense);

    let t = transactions::create(&mut conn, uid, &tx_input(acct, expense, Flow::Expense, "60")).unwrap();
    assert_eq!(balance_of(&conn, uid, acct), dec("-60"));

    // income flow against an expense category: rejected, nothing reconciled
    let err = transactions::update(&mut conn, uid, t.id, &tx_input(acct, expense, Flow::Income, "60"))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(balance_of(&conn, uid, acct), dec("-60"));

    // missing category: rejected before any ledger write
    let err = transactions::update(&mut conn, uid, t.id, &tx_input(acct, 9999, Flow::Income, "60"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("category")));
    assert_eq!(balance_of(&conn, uid, acct), dec("-60"));
}

#[test]
fn transactions_are_owner_scoped() {
    let (mut conn, uid) = setup();
    let other = users::create(&conn, "Other", "other@example.com", "USD").unwrap().id;
    let acct = account(&conn, uid, "Checking", "0");
    let income = category(&conn, uid, "Salary", Flow::Income);
    let t = transactions::create(&mut conn, uid, &tx_input(acct, income, Flow::Income, "50")).unwrap();

    assert!(matches!(
        transactions::get(&conn, other, t.id).unwrap_err(),
        Error::NotFound("transaction")
    ));
    assert!(matches!(
        transactions::delete(&mut conn, other, t.id).unwrap_err(),
        Error::NotFound("transaction")
    ));
    // still there, balance intact
    assert_eq!(balance_of(&conn, uid, acct), dec("50"));
}
